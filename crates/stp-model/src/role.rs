//! Role domain model.
//!
//! Roles drive the portal's role-based access control. A profile row stores
//! its role as a plain label; the four labels the portal knows about map to
//! dedicated variants and any other label is kept verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known role labels as stored in profile rows.
pub mod labels {
    /// Administrator of a business.
    pub const ADMIN: &str = "Admin";
    /// Field technician working job cards.
    pub const TECHNICIAN: &str = "Technician";
    /// Customer of a business.
    pub const CUSTOMER: &str = "Customer";
    /// Platform-wide super administrator.
    pub const SUPER_ADMIN: &str = "SuperAdmin";
}

/// A portal role.
///
/// Labels are matched exactly; `"admin"` is not `Admin`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// Business administrator.
    Admin,
    /// Field technician.
    Technician,
    /// Customer.
    Customer,
    /// Super administrator; bypasses every role requirement.
    SuperAdmin,
    /// A label the portal does not recognise.
    Other(String),
}

impl Role {
    /// Returns the label stored in profile rows.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => labels::ADMIN,
            Self::Technician => labels::TECHNICIAN,
            Self::Customer => labels::CUSTOMER,
            Self::SuperAdmin => labels::SUPER_ADMIN,
            Self::Other(label) => label,
        }
    }

    /// Checks if this is the super-admin role.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// Checks if this is one of the four known roles.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for Role {
    fn from(label: &str) -> Self {
        match label {
            labels::ADMIN => Self::Admin,
            labels::TECHNICIAN => Self::Technician,
            labels::CUSTOMER => Self::Customer,
            labels::SUPER_ADMIN => Self::SuperAdmin,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        match Self::from(label.as_str()) {
            Self::Other(_) => Self::Other(label),
            known => known,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
