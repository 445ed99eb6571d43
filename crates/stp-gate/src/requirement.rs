//! Role requirements attached to protected regions.

use std::fmt;

use stp_model::Role;

/// The set of roles allowed into a protected region.
///
/// Supplied by whoever mounts the region; never persisted. An empty
/// requirement admits only super-privileged callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleRequirement {
    roles: Vec<Role>,
}

impl RoleRequirement {
    /// Allows any of the given roles.
    #[must_use]
    pub fn any_of<I, R>(roles: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Role>,
    {
        let mut requirement = Self::default();
        for role in roles {
            requirement.push(role.into());
        }
        requirement
    }

    /// Allows a single role.
    #[must_use]
    pub fn only(role: impl Into<Role>) -> Self {
        Self::any_of([role])
    }

    /// Allows nobody but super-privileged callers.
    #[must_use]
    pub const fn nobody() -> Self {
        Self { roles: Vec::new() }
    }

    fn push(&mut self, role: Role) {
        if !self.roles.contains(&role) {
            self.roles.push(role);
        }
    }

    /// Checks whether a role is a member of the set.
    #[must_use]
    pub fn permits(&self, role: &Role) -> bool {
        self.roles.contains(role)
    }

    /// Returns the allowed roles in insertion order.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl fmt::Display for RoleRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.roles.is_empty() {
            return f.write_str("(none)");
        }
        let labels: Vec<_> = self.roles.iter().map(Role::as_str).collect();
        f.write_str(&labels.join(", "))
    }
}

impl<R: Into<Role>> FromIterator<R> for RoleRequirement {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
        Self::any_of(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permits_members_only() {
        let req = RoleRequirement::any_of([Role::Admin, Role::Customer]);
        assert!(req.permits(&Role::Admin));
        assert!(req.permits(&Role::Customer));
        assert!(!req.permits(&Role::Technician));
        assert!(!req.permits(&Role::SuperAdmin));
    }

    #[test]
    fn accepts_labels_and_dedupes() {
        let req: RoleRequirement = ["Admin", "Admin", "Supervisor"].into_iter().collect();
        assert_eq!(req.roles().len(), 2);
        assert!(req.permits(&Role::Other("Supervisor".to_string())));
        assert_eq!(req.to_string(), "Admin, Supervisor");
    }

    #[test]
    fn nobody_is_empty() {
        let req = RoleRequirement::nobody();
        assert!(req.is_empty());
        assert!(!req.permits(&Role::Admin));
        assert_eq!(req.to_string(), "(none)");
    }
}
