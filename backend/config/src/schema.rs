//! SoulForge deployment configuration schema.
//!
//! Typed for serde YAML deserialization. Every field is optional so a partial
//! (or absent) file is valid; `defaults` fills the gaps after loading.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::defaults::{
    DEFAULT_KV_PATH, DEFAULT_LOG_LEVEL, DEFAULT_MAX_CONTEXT_TURNS, DEFAULT_PERSONA_PATH,
    DEFAULT_SESSION_DIR,
};

/// Root deployment configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoulForgeConfig {
    /// Deployment-supplied completion endpoint settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm: Option<LlmConfig>,

    /// Conversation window and session persistence
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionConfig>,

    /// System preamble source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persona: Option<PersonaConfig>,

    /// Host key-value store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Turns kept verbatim before compaction (one turn = user + assistant)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_context_turns: Option<usize>,
    /// Directory holding one `<identity>.json` per conversation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kv_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    /// Log level filter: "error" | "warn" | "info" | "debug" | "trace"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    /// Directory for rolling JSON log files; console only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl SoulForgeConfig {
    pub fn max_context_turns(&self) -> usize {
        self.session
            .as_ref()
            .and_then(|s| s.max_context_turns)
            .unwrap_or(DEFAULT_MAX_CONTEXT_TURNS)
    }

    pub fn session_dir(&self) -> PathBuf {
        PathBuf::from(
            self.session
                .as_ref()
                .and_then(|s| s.dir.as_deref())
                .unwrap_or(DEFAULT_SESSION_DIR),
        )
    }

    pub fn persona_path(&self) -> PathBuf {
        PathBuf::from(
            self.persona
                .as_ref()
                .and_then(|p| p.path.as_deref())
                .unwrap_or(DEFAULT_PERSONA_PATH),
        )
    }

    pub fn kv_path(&self) -> PathBuf {
        PathBuf::from(
            self.storage
                .as_ref()
                .and_then(|s| s.kv_path.as_deref())
                .unwrap_or(DEFAULT_KV_PATH),
        )
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn log_dir(&self) -> Option<PathBuf> {
        self.logging
            .as_ref()
            .and_then(|l| l.dir.as_deref())
            .map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camel_case_yaml() {
        let yaml = r#"
llm:
  url: https://api.moonshot.cn/v1
  apiKey: sk-test
session:
  maxContextTurns: 6
"#;
        let config: SoulForgeConfig = serde_yaml::from_str(yaml).unwrap();
        let llm = config.llm.as_ref().unwrap();
        assert_eq!(llm.url.as_deref(), Some("https://api.moonshot.cn/v1"));
        assert_eq!(llm.api_key.as_deref(), Some("sk-test"));
        assert_eq!(llm.model, None);
        assert_eq!(config.max_context_turns(), 6);
    }

    #[test]
    fn test_accessors_fall_back_to_defaults() {
        let config = SoulForgeConfig::default();
        assert_eq!(config.max_context_turns(), DEFAULT_MAX_CONTEXT_TURNS);
        assert_eq!(config.session_dir(), PathBuf::from(DEFAULT_SESSION_DIR));
        assert_eq!(config.log_level(), "info");
        assert!(config.log_dir().is_none());
    }
}
