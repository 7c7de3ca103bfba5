//! Well-known account role names.
//!
//! These must match the `ck_users_role` check constraint in the users migration.
//! Group leadership is not an account role; see [`crate::status::GroupRole`].

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_ENTERPRISE: &str = "enterprise";
pub const ROLE_USER: &str = "user";

/// Every role an account may hold.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_ENTERPRISE, ROLE_USER];

/// Roles a visitor may pick when registering. Admins are appointed, never self-registered.
pub const SELF_REGISTER_ROLES: &[&str] = &[ROLE_ENTERPRISE, ROLE_USER];

pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

pub fn can_self_register(role: &str) -> bool {
    SELF_REGISTER_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_are_valid() {
        assert!(is_valid_role("admin"));
        assert!(is_valid_role("enterprise"));
        assert!(is_valid_role("user"));
    }

    #[test]
    fn unknown_roles_are_rejected() {
        assert!(!is_valid_role("leader"));
        assert!(!is_valid_role(""));
        assert!(!is_valid_role("ADMIN"));
    }

    #[test]
    fn admin_cannot_self_register() {
        assert!(!can_self_register(ROLE_ADMIN));
        assert!(can_self_register(ROLE_USER));
        assert!(can_self_register(ROLE_ENTERPRISE));
    }
}
