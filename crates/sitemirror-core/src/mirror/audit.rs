use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

const DETAILS_PREVIEW_CHARS: usize = 30;

/// One row of the server's audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub timestamp: String,
    pub user: String,
    pub action: String,
    pub details: String,
}

impl AuditEntry {
    pub fn category(&self) -> ActionCategory {
        ActionCategory::classify(&self.action)
    }

    /// Details shortened for list rows: 30 characters followed by `...`.
    pub fn details_preview(&self) -> String {
        if self.details.chars().count() > DETAILS_PREVIEW_CHARS {
            let head: String = self.details.chars().take(DETAILS_PREVIEW_CHARS).collect();
            format!("{head}...")
        } else {
            self.details.clone()
        }
    }

    /// Parses the timestamp as RFC 3339 or a naive ISO-8601 datetime.
    ///
    /// Returns `None` when the server sent something else; callers then
    /// show the raw string.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        let raw = self.timestamp.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.naive_utc());
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }
}

/// Coarse grouping of audit actions, used for colouring and icons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Login,
    Logout,
    Update,
    Create,
    Delete,
    Other,
}

impl ActionCategory {
    /// Substring classification; `login` is checked before `logout`
    /// and neither contains the other.
    pub fn classify(action: &str) -> Self {
        if action.contains("login") {
            Self::Login
        } else if action.contains("logout") {
            Self::Logout
        } else if action.contains("update") {
            Self::Update
        } else if action.contains("create") {
            Self::Create
        } else if action.contains("delete") {
            Self::Delete
        } else {
            Self::Other
        }
    }
}

/// Aggregate numbers shown above the audit list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditSummary {
    pub entries: usize,
    pub distinct_users: usize,
}

impl AuditSummary {
    pub fn from_entries(entries: &[AuditEntry]) -> Self {
        let users: HashSet<&str> = entries.iter().map(|e| e.user.as_str()).collect();
        Self {
            entries: entries.len(),
            distinct_users: users.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(user: &str, action: &str, details: &str) -> AuditEntry {
        AuditEntry {
            timestamp: "2024-05-01T10:00:00".to_string(),
            user: user.to_string(),
            action: action.to_string(),
            details: details.to_string(),
        }
    }

    #[test]
    fn test_classify_actions() {
        assert_eq!(ActionCategory::classify("login"), ActionCategory::Login);
        assert_eq!(ActionCategory::classify("logout"), ActionCategory::Logout);
        assert_eq!(ActionCategory::classify("manual_update"), ActionCategory::Update);
        assert_eq!(ActionCategory::classify("auto_updates_found"), ActionCategory::Update);
        assert_eq!(ActionCategory::classify("create_user"), ActionCategory::Create);
        assert_eq!(ActionCategory::classify("delete_page"), ActionCategory::Delete);
        assert_eq!(ActionCategory::classify("chat_send"), ActionCategory::Other);
    }

    #[test]
    fn test_details_preview_truncates_long_text() {
        let long = entry("a", "chat_send", "абвгдеёжзийклмнопрстуфхцчшщъыьэюя");
        let preview = long.details_preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 33);

        let short = entry("a", "login", "successful");
        assert_eq!(short.details_preview(), "successful");
    }

    #[test]
    fn test_summary_counts_distinct_users() {
        let entries = vec![
            entry("alice", "login", ""),
            entry("bob", "login", ""),
            entry("alice", "logout", ""),
        ];
        let summary = AuditSummary::from_entries(&entries);
        assert_eq!(summary.entries, 3);
        assert_eq!(summary.distinct_users, 2);
    }

    #[test]
    fn test_parsed_timestamp_accepts_iso_forms() {
        assert!(entry("a", "b", "").parsed_timestamp().is_some());

        let mut with_micros = entry("a", "b", "");
        with_micros.timestamp = "2024-05-01T10:00:00.123456".to_string();
        assert!(with_micros.parsed_timestamp().is_some());

        let mut garbage = entry("a", "b", "");
        garbage.timestamp = "yesterday".to_string();
        assert!(garbage.parsed_timestamp().is_none());
    }
}
