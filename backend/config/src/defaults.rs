//! Config defaults: built-in values applied to parsed config.

use std::time::Duration;
use tracing::warn;

use crate::schema::{LoggingConfig, SessionConfig, SoulForgeConfig};

/// Built-in completion endpoint.
pub const DEFAULT_LLM_URL: &str = "https://api.openai.com/v1";

/// Built-in model.
pub const DEFAULT_LLM_MODEL: &str = "gpt-3.5-turbo";

/// Turns kept verbatim before compaction.
pub const DEFAULT_MAX_CONTEXT_TURNS: usize = 10;

/// A summarized log holds three messages, so the window must allow at least four.
pub const MIN_CONTEXT_TURNS: usize = 2;

pub const DEFAULT_SESSION_DIR: &str = "data/llm-playground/sessions";

pub const DEFAULT_PERSONA_PATH: &str = "soul/PERSONA.md";

pub const DEFAULT_KV_PATH: &str = "data/cache.db";

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Upper bound for one completion call.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Apply all defaults to a freshly loaded config.
///
/// LLM fields are left untouched: an unset value there means "no deployment
/// override" to the runtime overlay, not "use the default".
pub fn apply_all_defaults(config: SoulForgeConfig) -> SoulForgeConfig {
    let config = apply_session_defaults(config);
    apply_logging_defaults(config)
}

/// Ensure the context window is set and large enough to hold a summary.
fn apply_session_defaults(mut config: SoulForgeConfig) -> SoulForgeConfig {
    let session = config.session.get_or_insert_with(SessionConfig::default);
    match session.max_context_turns {
        None => session.max_context_turns = Some(DEFAULT_MAX_CONTEXT_TURNS),
        Some(turns) if turns < MIN_CONTEXT_TURNS => {
            warn!(
                configured = turns,
                applied = MIN_CONTEXT_TURNS,
                "maxContextTurns too small; raising"
            );
            session.max_context_turns = Some(MIN_CONTEXT_TURNS);
        }
        Some(_) => {}
    }
    if session.dir.is_none() {
        session.dir = Some(DEFAULT_SESSION_DIR.to_string());
    }
    config
}

fn apply_logging_defaults(mut config: SoulForgeConfig) -> SoulForgeConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fills_session_defaults() {
        let config = apply_all_defaults(SoulForgeConfig::default());
        let session = config.session.unwrap();
        assert_eq!(session.max_context_turns, Some(DEFAULT_MAX_CONTEXT_TURNS));
        assert_eq!(session.dir.as_deref(), Some(DEFAULT_SESSION_DIR));
    }

    #[test]
    fn test_raises_tiny_window() {
        let config = SoulForgeConfig {
            session: Some(SessionConfig {
                max_context_turns: Some(1),
                dir: None,
            }),
            ..Default::default()
        };
        assert_eq!(apply_all_defaults(config).max_context_turns(), MIN_CONTEXT_TURNS);
    }

    #[test]
    fn test_llm_layer_not_defaulted() {
        let config = apply_all_defaults(SoulForgeConfig::default());
        assert!(config.llm.is_none());
    }
}
