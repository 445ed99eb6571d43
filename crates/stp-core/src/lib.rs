//! # stp-core
//!
//! Core types shared by every STP portal crate.
//!
//! This crate provides the foundational error type, the configuration of the
//! hosted auth/database backend, and the access-event model used for audit
//! logging of gate decisions.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::BackendConfig;
pub use error::{Error, Result};
pub use event::{AccessEvent, AccessEventBuilder, EventOutcome, EventType};
