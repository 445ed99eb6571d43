//! # stp-session
//!
//! Session and profile resolution for the STP portal.
//!
//! The portal owns no identity data. Sessions come from the hosted auth
//! provider and profiles from the hosted database; this crate defines the
//! interfaces the access gate reads through and ships two implementations:
//!
//! - [`memory`] - in-process providers for tests and local development
//! - [`hosted`] - REST client for the hosted auth/database service
//!
//! ## Provider Traits
//!
//! - [`SessionProvider`] - resolve the current session from a [`SessionContext`]
//! - [`ProfileStore`] - look up the profile for a subject
//! - [`SignInProvider`] - exchange credentials for a session and revoke it
//!
//! [`SessionContext`]: stp_model::SessionContext

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod hosted;
pub mod memory;
pub mod provider;

pub use error::{SessionError, SessionResult};
pub use hosted::HostedBackend;
pub use memory::{MemoryDirectory, MemoryProfileStore, MemorySessionProvider};
pub use provider::{ProfileStore, SessionProvider, SignInProvider};
