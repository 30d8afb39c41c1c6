//! Durable form of a conversation.
//!
//! Serialized as `{ "messages": [{role, content}], "latest_summary": ... }`,
//! pretty-printed so the file stays diffable and hand-editable.

use serde::{Deserialize, Deserializer, Serialize};

use crate::message::ChatMessage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub messages: Vec<ChatMessage>,
    /// Most recent successful summarization; `""` and `null` both mean none.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub latest_summary: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<ChatMessage>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<ChatMessage>>::deserialize(deserializer)?.unwrap_or_default())
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_hand_edited_record() {
        let raw = r#"{
            "messages": [
                {"role": "user", "content": "早上好"},
                {"role": "assistant", "content": "早！"}
            ],
            "latest_summary": ""
        }"#;
        let record: SessionRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.messages.len(), 2);
        assert_eq!(record.messages[1], ChatMessage::assistant("早！"));
        assert_eq!(record.latest_summary, None);
    }

    #[test]
    fn test_null_messages_are_empty() {
        let record: SessionRecord =
            serde_json::from_str(r#"{"messages": null, "latest_summary": "S"}"#).unwrap();
        assert!(record.messages.is_empty());
        assert_eq!(record.latest_summary.as_deref(), Some("S"));
    }

    #[test]
    fn test_missing_fields_default() {
        let record: SessionRecord = serde_json::from_str("{}").unwrap();
        assert_eq!(record, SessionRecord::default());
    }
}
