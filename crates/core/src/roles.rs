//! Well-known role names.
//!
//! Role names are stored as plain text on the `users` table and embedded in
//! JWT claims, so the constants here are the single source of truth for the
//! accepted spellings.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COORDINADOR: &str = "coordinador";
pub const ROLE_LIDER: &str = "lider";

/// Every role a user row may carry.
pub const ALL_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_COORDINADOR, ROLE_LIDER];

/// Parsed role, used by the policy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Coordinador,
    Lider,
}

impl Role {
    /// Parse a stored role name. Returns `None` for unknown spellings so a
    /// corrupted or stale claim can never silently match a rule.
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            ROLE_ADMIN => Some(Role::Admin),
            ROLE_COORDINADOR => Some(Role::Coordinador),
            ROLE_LIDER => Some(Role::Lider),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => ROLE_ADMIN,
            Role::Coordinador => ROLE_COORDINADOR,
            Role::Lider => ROLE_LIDER,
        }
    }
}
