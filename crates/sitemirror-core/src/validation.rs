//! Client-side form checks run before a request is dispatched.

use crate::error::{MirrorError, Result};
use crate::session::Role;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Input of the change-password form.
#[derive(Debug, Clone, Default)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChange {
    pub fn new(
        old_password: impl Into<String>,
        new_password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            old_password: old_password.into(),
            new_password: new_password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.old_password.is_empty()
            || self.new_password.is_empty()
            || self.confirm_password.is_empty()
        {
            return Err(MirrorError::validation("Please fill in all fields"));
        }
        if self.new_password != self.confirm_password {
            return Err(MirrorError::validation("New passwords do not match"));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(MirrorError::validation(format!(
                "New password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Input of the admin create-user form.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl NewUser {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() || self.password.trim().is_empty() {
            return Err(MirrorError::validation("Please fill in all fields"));
        }
        Ok(())
    }
}

/// Trims a chat message, returning `None` when nothing is left to send.
pub fn normalize_chat_message(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_change_rules() {
        assert!(PasswordChange::new("old", "secret1", "secret1").validate().is_ok());

        let missing = PasswordChange::new("", "secret1", "secret1").validate();
        assert!(matches!(missing, Err(MirrorError::Validation(_))));

        let mismatch = PasswordChange::new("old", "secret1", "secret2").validate();
        assert_eq!(
            mismatch.unwrap_err().to_string(),
            "New passwords do not match"
        );

        let short = PasswordChange::new("old", "abc", "abc").validate();
        assert!(short.unwrap_err().to_string().contains("at least 6"));
    }

    #[test]
    fn test_new_user_requires_both_fields() {
        assert!(NewUser::new("carol", "pw", Role::User).validate().is_ok());
        assert!(NewUser::new("  ", "pw", Role::User).validate().is_err());
        assert!(NewUser::new("carol", " ", Role::Admin).validate().is_err());
    }

    #[test]
    fn test_chat_message_normalization() {
        assert_eq!(normalize_chat_message("  hi \n"), Some("hi"));
        assert_eq!(normalize_chat_message("   "), None);
    }
}
