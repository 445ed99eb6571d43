//! The access decision.
//!
//! [`decide`] is pure: it looks only at what was resolved for the current
//! navigation and the requirement of the region being entered. All I/O
//! (fetching the session and profile, performing the redirect) happens at
//! the boundary in [`crate::gate`] and [`crate::middleware`].

use serde::Serialize;
use stp_model::{Profile, Role, Session};

use crate::requirement::RoleRequirement;

/// Login entry point for unauthenticated callers.
pub const LOGIN_PATH: &str = "/auth/login";

/// Landing area for administrators.
pub const ADMIN_PATH: &str = "/admin";

/// Landing area for customers.
pub const CUSTOMER_PATH: &str = "/customer";

/// Landing area for technicians and any unrecognised role.
pub const TECHNICIAN_PATH: &str = "/technician";

/// The one email address that bypasses every role requirement.
pub const SUPER_ADMIN_EMAIL: &str = "admin@stp.com";

/// State of the gate for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AccessState {
    /// Resolution pending; content is withheld.
    Loading,
    /// No usable session or profile; go to login.
    Unauthenticated,
    /// Render the protected content.
    Authorized,
    /// Authenticated but not allowed here; go to the landing area.
    Forbidden {
        /// Landing path for the caller's role.
        redirect: &'static str,
    },
}

impl AccessState {
    /// Whether resolution has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Loading)
    }

    /// Whether the protected content may be rendered.
    #[must_use]
    pub const fn renders_content(&self) -> bool {
        matches!(self, Self::Authorized)
    }

    /// Where the caller must be sent, if anywhere.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Unauthenticated => Some(LOGIN_PATH),
            Self::Forbidden { redirect } => Some(*redirect),
            Self::Loading | Self::Authorized => None,
        }
    }

    /// Short name for logs and CLI output.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Unauthenticated => "unauthenticated",
            Self::Authorized => "authorized",
            Self::Forbidden { .. } => "forbidden",
        }
    }
}

/// Maps a role to its landing area.
#[must_use]
pub const fn landing_path(role: &Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_PATH,
        Role::Customer => CUSTOMER_PATH,
        _ => TECHNICIAN_PATH,
    }
}

/// Whether the profile bypasses role requirements.
///
/// Matches the super-admin role label, or the super-admin email exactly.
#[must_use]
pub fn is_super_privileged(profile: &Profile) -> bool {
    profile.role.is_super_admin() || profile.email == SUPER_ADMIN_EMAIL
}

/// The area a signed-in caller lands on when no region was asked for.
#[must_use]
pub fn home_path(profile: &Profile) -> &'static str {
    if is_super_privileged(profile) {
        ADMIN_PATH
    } else {
        landing_path(&profile.role)
    }
}

/// Decides access for one navigation.
///
/// A profile that does not belong to the session subject is treated as
/// missing. Never returns [`AccessState::Loading`].
#[must_use]
pub fn decide(
    session: Option<&Session>,
    profile: Option<&Profile>,
    allowed: &RoleRequirement,
) -> AccessState {
    let (Some(session), Some(profile)) = (session, profile) else {
        return AccessState::Unauthenticated;
    };

    if profile.user_id != session.user_id {
        return AccessState::Unauthenticated;
    }

    if is_super_privileged(profile) || allowed.permits(&profile.role) {
        AccessState::Authorized
    } else {
        AccessState::Forbidden {
            redirect: landing_path(&profile.role),
        }
    }
}
