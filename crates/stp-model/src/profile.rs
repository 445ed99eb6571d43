//! Profile domain model.
//!
//! A profile is the role-bearing record the portal keeps for each auth
//! subject. Profiles are provisioned out-of-band; the gate only reads them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// The profile row for an auth subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Subject identifier (same as the session's user ID).
    pub user_id: Uuid,
    /// Role label.
    pub role: Role,
    /// Email address recorded on the profile.
    pub email: String,
}

impl Profile {
    /// Creates a new profile.
    #[must_use]
    pub fn new(user_id: Uuid, role: impl Into<Role>, email: impl Into<String>) -> Self {
        Self {
            user_id,
            role: role.into(),
            email: email.into(),
        }
    }
}
