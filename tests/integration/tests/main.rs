//! End-to-end integration tests
//!
//! These tests run the portal server on an ephemeral port, backed either by
//! the in-memory providers or by a fake hosted backend.

mod common;
mod gate_redirects;
mod hosted_backend;
mod login_flow;
