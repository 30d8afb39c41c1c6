//! System prompt assembly from the persona document.

use std::path::Path;

use tracing::{info, warn};

/// Used when no persona document is available.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// Appended after the persona text.
pub const ROLEPLAY_SUFFIX: &str = "\n\n我希望你扮演我所描述的人物";

pub struct PromptBuilder;

impl PromptBuilder {
    /// Builds the system prompt from persona text.
    pub fn from_persona(persona: &str) -> String {
        let persona = persona.trim();
        if persona.is_empty() {
            return DEFAULT_SYSTEM_PROMPT.to_string();
        }
        format!("{persona}{ROLEPLAY_SUFFIX}")
    }

    /// Reads the persona document once. A missing or unreadable file falls
    /// back to the default prompt.
    pub async fn load(path: &Path) -> String {
        match tokio::fs::read_to_string(path).await {
            Ok(persona) => {
                info!(path = %path.display(), chars = persona.chars().count(), "Persona loaded");
                Self::from_persona(&persona)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "No persona document, using default prompt");
                DEFAULT_SYSTEM_PROMPT.to_string()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Persona not readable, using default prompt");
                DEFAULT_SYSTEM_PROMPT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_gets_roleplay_suffix() {
        let prompt = PromptBuilder::from_persona("\n你是一只猫娘，说话带“喵”。\n\n");
        assert_eq!(prompt, "你是一只猫娘，说话带“喵”。\n\n我希望你扮演我所描述的人物");
    }

    #[test]
    fn test_blank_persona_uses_default() {
        assert_eq!(PromptBuilder::from_persona("  \n"), DEFAULT_SYSTEM_PROMPT);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("PERSONA.md");
        std::fs::write(&path, "# 小雪\n温柔的学姐").unwrap();
        let prompt = PromptBuilder::load(&path).await;
        assert!(prompt.starts_with("# 小雪\n温柔的学姐"));
        assert!(prompt.ends_with(ROLEPLAY_SUFFIX));
    }

    #[tokio::test]
    async fn test_missing_file_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let prompt = PromptBuilder::load(&dir.path().join("nope.md")).await;
        assert_eq!(prompt, DEFAULT_SYSTEM_PROMPT);
    }
}
