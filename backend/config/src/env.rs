//! Environment variable handling for config values.
//!
//! Two mechanisms:
//! - `${VAR_NAME}` substitution inside string values of the config file,
//!   resolved at load time. Only uppercase `[A-Z_][A-Z0-9_]*` names match and
//!   `$${VAR}` escapes to a literal `${VAR}`.
//! - Whole-field overrides (`SOULFORGE_LLM_URL`, ...) applied after the file.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;

use crate::schema::{LlmConfig, PersonaConfig, SoulForgeConfig};

pub const ENV_LLM_URL: &str = "SOULFORGE_LLM_URL";
pub const ENV_LLM_KEY: &str = "SOULFORGE_LLM_KEY";
pub const ENV_LLM_MODEL: &str = "SOULFORGE_LLM_MODEL";
pub const ENV_PERSONA_PATH: &str = "SOUL_PERSONA_PATH";

/// Group 1 is the escape marker, group 2 the variable name.
static ENV_VAR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\$)?\{([A-Z_][A-Z0-9_]*)\}").unwrap());

/// Error returned for missing env vars.
#[derive(Debug, thiserror::Error)]
#[error("Missing env var \"{var_name}\" referenced at config path: {config_path}")]
pub struct MissingEnvVarError {
    pub var_name: String,
    pub config_path: String,
}

/// Snapshot of the process environment.
pub fn process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}

/// Substitute `${VAR}` references in a config JSON value tree.
///
/// Only string leaves are processed. Returns an error if any referenced
/// variable is unset or empty.
pub fn resolve_env_vars_with(value: &Value, env: &HashMap<String, String>) -> Result<Value> {
    substitute_value(value, env, "")
}

fn substitute_value(value: &Value, env: &HashMap<String, String>, path: &str) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_string(s, env, path)?)),
        Value::Array(arr) => {
            let result: Result<Vec<_>> = arr
                .iter()
                .enumerate()
                .map(|(i, v)| substitute_value(v, env, &format!("{path}[{i}]")))
                .collect();
            Ok(Value::Array(result?))
        }
        Value::Object(map) => {
            let mut result = serde_json::Map::new();
            for (k, v) in map {
                let child_path = if path.is_empty() {
                    k.clone()
                } else {
                    format!("{path}.{k}")
                };
                result.insert(k.clone(), substitute_value(v, env, &child_path)?);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other.clone()),
    }
}

fn substitute_string(s: &str, env: &HashMap<String, String>, path: &str) -> Result<String> {
    if !s.contains('$') {
        return Ok(s.to_string());
    }

    let mut missing: Option<MissingEnvVarError> = None;
    let substituted = ENV_VAR_PATTERN.replace_all(s, |caps: &Captures| {
        let var_name = &caps[2];
        if caps.get(1).is_some() {
            return format!("${{{var_name}}}");
        }
        match env.get(var_name) {
            Some(val) if !val.is_empty() => val.clone(),
            _ => {
                missing.get_or_insert_with(|| MissingEnvVarError {
                    var_name: var_name.to_string(),
                    config_path: path.to_string(),
                });
                String::new()
            }
        }
    });

    if let Some(err) = missing {
        bail!(err);
    }
    Ok(substituted.into_owned())
}

/// Overlay whole-field environment overrides onto the deployment config.
///
/// Empty variables are ignored.
pub fn apply_env_overrides(
    mut config: SoulForgeConfig,
    env: &HashMap<String, String>,
) -> SoulForgeConfig {
    let get = |name: &str| env.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

    if let Some(url) = get(ENV_LLM_URL) {
        config.llm.get_or_insert_with(LlmConfig::default).url = Some(url.to_string());
    }
    if let Some(key) = get(ENV_LLM_KEY) {
        config.llm.get_or_insert_with(LlmConfig::default).api_key = Some(key.to_string());
    }
    if let Some(model) = get(ENV_LLM_MODEL) {
        config.llm.get_or_insert_with(LlmConfig::default).model = Some(model.to_string());
    }
    if let Some(path) = get(ENV_PERSONA_PATH) {
        config.persona.get_or_insert_with(PersonaConfig::default).path = Some(path.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn substitutes_simple_var() {
        let v = json!({"llm": {"apiKey": "${OPENAI_API_KEY}"}});
        let env = env(&[("OPENAI_API_KEY", "sk-abc123")]);
        let result = resolve_env_vars_with(&v, &env).unwrap();
        assert_eq!(result["llm"]["apiKey"], "sk-abc123");
    }

    #[test]
    fn error_names_missing_var_and_path() {
        let v = json!({"llm": {"url": "${MISSING_VAR}/v1"}});
        let err = resolve_env_vars_with(&v, &HashMap::new()).unwrap_err().to_string();
        assert!(err.contains("MISSING_VAR"));
        assert!(err.contains("llm.url"));
    }

    #[test]
    fn escaped_reference_is_literal() {
        let v = json!({"persona": {"path": "$${HOME}/persona.md"}});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["persona"]["path"], "${HOME}/persona.md");
    }

    #[test]
    fn lowercase_names_pass_through() {
        let v = json!({"x": "${not_a_var}"});
        let result = resolve_env_vars_with(&v, &HashMap::new()).unwrap();
        assert_eq!(result["x"], "${not_a_var}");
    }

    #[test]
    fn overrides_replace_file_values() {
        let config = SoulForgeConfig {
            llm: Some(LlmConfig {
                url: Some("https://file.example/v1".into()),
                api_key: None,
                model: Some("file-model".into()),
            }),
            ..Default::default()
        };
        let env = env(&[(ENV_LLM_URL, "https://env.example/v1"), (ENV_LLM_MODEL, "  ")]);
        let config = apply_env_overrides(config, &env);
        let llm = config.llm.unwrap();
        assert_eq!(llm.url.as_deref(), Some("https://env.example/v1"));
        assert_eq!(llm.model.as_deref(), Some("file-model"));
        assert_eq!(llm.api_key, None);
    }
}
