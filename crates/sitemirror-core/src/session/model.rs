//! Session domain model.
//!
//! A session is the pair of an opaque server-issued token and the user
//! record it belongs to. Token presence alone decides whether the client
//! treats itself as authenticated; expiry is only discovered when the
//! server answers 401.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account on the mirror server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Wire value used by the server's forms (`user` / `admin`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Human-readable label for profile screens.
    pub fn label(&self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Admin => "Administrator",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// The user record persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    #[serde(default)]
    pub role: Role,
}

impl User {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

/// An authenticated session.
///
/// Absence of a session is modeled as `Option<Session>` by callers, so a
/// value of this type always carries both a token and a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serializes_role_lowercase() {
        let user = User::new("alice", Role::Admin);
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"username":"alice","role":"admin"}"#);
    }

    #[test]
    fn test_user_role_defaults_to_user() {
        let user: User = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
        assert_eq!(user.role, Role::User);
    }

    #[test]
    fn test_role_parse_and_label() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert_eq!(Role::Admin.label(), "Administrator");
        assert_eq!(Role::User.to_string(), "user");
    }
}
