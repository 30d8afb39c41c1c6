//! Config validation with path-qualified messages.

use crate::defaults::MIN_CONTEXT_TURNS;
use crate::schema::SoulForgeConfig;
use thiserror::Error;

/// A config validation finding with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// All findings from one validation pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SoulForgeConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_llm(config, &mut report);
    validate_session(config, &mut report);
    report
}

fn validate_llm(config: &SoulForgeConfig, report: &mut ValidationReport) {
    let Some(llm) = &config.llm else { return };
    if let Some(url) = &llm.url {
        let url = url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            report.error("llm.url", format!("Expected an http(s) URL, got '{url}'"));
        }
    }
    if let Some(model) = &llm.model {
        if model.trim().is_empty() {
            report.warn("llm.model", "Empty model name is ignored");
        }
    }
}

fn validate_session(config: &SoulForgeConfig, report: &mut ValidationReport) {
    let Some(session) = &config.session else { return };
    if let Some(turns) = session.max_context_turns {
        if turns < MIN_CONTEXT_TURNS {
            report.warn(
                "session.maxContextTurns",
                format!("{turns} is below the minimum of {MIN_CONTEXT_TURNS}"),
            );
        }
    }
}
