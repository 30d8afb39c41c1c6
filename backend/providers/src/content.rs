//! Reply content extraction.
//!
//! OpenAI-compatible services return `message.content` either as a plain
//! string or as a list of typed segments (Moonshot, vision models). Only
//! `text` segments contribute to the reply.

use serde::Deserialize;
use serde_json::Value;
use soulforge_core::SoulError;

#[derive(Deserialize)]
struct ContentSegment {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    text: String,
}

/// Extract the reply text. An empty result is an error, never an empty success.
pub fn extract_content(content: &Value) -> Result<String, SoulError> {
    let text = match content {
        Value::Null => return Err(SoulError::EmptyContent),
        Value::String(s) => s.trim().to_string(),
        Value::Array(_) => {
            let segments: Vec<ContentSegment> = serde_json::from_value(content.clone())
                .map_err(|e| SoulError::MalformedContent(e.to_string()))?;
            segments
                .iter()
                .filter(|s| s.kind == "text")
                .map(|s| s.text.as_str())
                .collect::<String>()
                .trim()
                .to_string()
        }
        other => {
            return Err(SoulError::MalformedContent(format!("unexpected value {other}")));
        }
    };

    if text.is_empty() {
        Err(SoulError::EmptyContent)
    } else {
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_is_trimmed() {
        assert_eq!(extract_content(&json!("  你好 \n")).unwrap(), "你好");
    }

    #[test]
    fn test_text_segments_concatenate() {
        let content = json!([{"type": "text", "text": "a"}, {"type": "text", "text": "b"}]);
        assert_eq!(extract_content(&content).unwrap(), "ab");
    }

    #[test]
    fn test_non_text_segments_ignored() {
        let content = json!([
            {"type": "image_url", "image_url": {"url": "https://x/y.png"}},
            {"type": "text", "text": "caption"}
        ]);
        assert_eq!(extract_content(&content).unwrap(), "caption");
    }

    #[test]
    fn test_empty_string_is_failure() {
        assert!(matches!(extract_content(&json!("")), Err(SoulError::EmptyContent)));
        assert!(matches!(extract_content(&json!("   ")), Err(SoulError::EmptyContent)));
    }

    #[test]
    fn test_empty_array_is_failure() {
        assert!(matches!(extract_content(&json!([])), Err(SoulError::EmptyContent)));
    }

    #[test]
    fn test_missing_content_is_failure() {
        assert!(matches!(extract_content(&Value::Null), Err(SoulError::EmptyContent)));
    }

    #[test]
    fn test_other_shapes_are_malformed() {
        assert!(matches!(extract_content(&json!(42)), Err(SoulError::MalformedContent(_))));
        assert!(matches!(
            extract_content(&json!({"text": "x"})),
            Err(SoulError::MalformedContent(_))
        ));
        assert!(matches!(
            extract_content(&json!(["bare string"])),
            Err(SoulError::MalformedContent(_))
        ));
    }
}
