//! # stp-model
//!
//! Domain models for the STP portal access gate.
//!
//! - [`Role`] - role labels carried by profiles
//! - [`Profile`] - the role-bearing record for an auth subject
//! - [`Session`] - the identity issued by the hosted auth provider
//! - [`SessionContext`] - the per-navigation input the gate resolves from

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod profile;
pub mod role;
pub mod session;

pub use profile::Profile;
pub use role::Role;
pub use session::{Session, SessionContext};
