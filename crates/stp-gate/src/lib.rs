//! # stp-gate
//!
//! Role-based access gate for the STP portal.
//!
//! Every protected region of the portal is wrapped by the gate. For each
//! navigation the gate resolves the caller's session, fetches the profile for
//! the session subject and decides one of three outcomes:
//!
//! | outcome | effect |
//! |---------|--------|
//! | `Unauthenticated` | redirect to `/auth/login` |
//! | `Authorized` | render the protected content |
//! | `Forbidden` | redirect to the caller's landing area |
//!
//! Until resolution completes the gate reports `Loading` and withholds the
//! content.
//!
//! ## Modules
//!
//! - [`decision`] - the pure decision function and routing table
//! - [`requirement`] - role sets attached to protected regions
//! - [`gate`] - session/profile resolution and navigation lifecycle
//! - [`events`] - audit logging of decisions
//! - [`middleware`] - axum middleware and the [`Viewer`] extractor

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod decision;
pub mod events;
pub mod gate;
pub mod middleware;
pub mod requirement;

pub use decision::{
    decide, home_path, is_super_privileged, landing_path, AccessState, ADMIN_PATH, CUSTOMER_PATH,
    LOGIN_PATH, SUPER_ADMIN_EMAIL, TECHNICIAN_PATH,
};
pub use events::{AccessEventLogger, InMemoryEventLogger, TracingEventLogger};
pub use gate::{AccessGate, Navigation, Resolution, Settlement};
pub use middleware::{require_roles, session_context, Viewer, ACCESS_TOKEN_COOKIE};
pub use requirement::RoleRequirement;
