// ── Users and roles ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Account role, lowest privilege first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    User,
    Manager,
    Admin,
}

impl Role {
    /// Parse a role reported by the backend. Unknown roles fall back to
    /// [`Role::User`] so local affordances never grant more than intended.
    pub fn from_backend(raw: &str) -> Self {
        raw.parse().unwrap_or_else(|_| {
            tracing::warn!(role = raw, "unknown role from backend, treating as user");
            Self::User
        })
    }
}

/// Who the current session belongs to, as confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub role: Role,
}

/// A user account as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub is_banned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip_and_fallback() {
        assert_eq!(Role::from_backend("Admin"), Role::Admin);
        assert_eq!(Role::from_backend("manager"), Role::Manager);
        assert_eq!(Role::from_backend("superuser"), Role::User);
        assert_eq!(Role::Manager.to_string(), "manager");
        assert!(Role::Admin > Role::Manager);
    }
}
