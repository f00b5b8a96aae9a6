use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chat message decoded from the chat page.
///
/// The server provides no message id, so `id` is generated on every
/// decode. It is only stable for the lifetime of one decoded list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user: String,
    pub timestamp: String,
    pub text: String,
}

impl ChatMessage {
    pub fn new(user: impl Into<String>, timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user: user.into(),
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }

    /// Whether this message was written by `username`.
    pub fn is_own(&self, username: &str) -> bool {
        self.user == username
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = ChatMessage::new("alice", "", "hi");
        let b = ChatMessage::new("alice", "", "hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_is_own() {
        let msg = ChatMessage::new("alice", "", "hi");
        assert!(msg.is_own("alice"));
        assert!(!msg.is_own("Alice"));
    }
}
