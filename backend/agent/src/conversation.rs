//! In-memory state of one identity's conversation.

use std::sync::Arc;

use soulforge_core::{ChatMessage, SessionRecord};
use tokio::sync::Mutex;

/// Shared handle to a live conversation. Holding the lock serializes turns
/// for that identity.
pub type ConversationHandle = Arc<Mutex<Conversation>>;

/// Ordered message log plus the last summary produced for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conversation {
    pub messages: Vec<ChatMessage>,
    pub latest_summary: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_record(record: SessionRecord) -> Self {
        Self {
            messages: record.messages,
            latest_summary: record.latest_summary,
        }
    }

    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            messages: self.messages.clone(),
            latest_summary: self.latest_summary.clone(),
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_conversion_keeps_everything() {
        let record = SessionRecord {
            messages: vec![ChatMessage::user("hi"), ChatMessage::assistant("hey")],
            latest_summary: Some("greeted".into()),
        };
        let conversation = Conversation::from_record(record.clone());
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation.to_record(), record);
    }
}
