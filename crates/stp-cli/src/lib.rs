//! # stp-cli
//!
//! Operator CLI for the STP portal access gate.
//!
//! This crate provides command-line utilities for:
//! - Evaluating access decisions offline (`stp check`)
//! - Resolving live tokens against the hosted backend (`stp resolve`)
//! - Printing the landing table (`stp routes`)
//! - Managing CLI configuration (`stp config`)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
