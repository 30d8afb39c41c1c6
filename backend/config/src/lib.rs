//! `soulforge-config`: SoulForge runtime configuration.
//!
//! Provides:
//! - Typed deployment config schema (YAML)
//! - `${ENV_VAR}` substitution and whole-field env overrides
//! - Default value application and validation
//! - Config redaction for safe logging
//! - The runtime LLM settings overlay (default → deployment → live update)

pub mod defaults;
pub mod env;
pub mod io;
pub mod overlay;
pub mod redact;
pub mod schema;
pub mod validation;

pub use defaults::{apply_all_defaults, COMPLETION_TIMEOUT};
pub use env::{apply_env_overrides, process_env, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_file_path, data_dir, load_config};
pub use overlay::{LlmField, LlmSettings, RuntimeConfig};
pub use redact::{mask_secret, redact};
pub use schema::SoulForgeConfig;
pub use validation::{validate, ConfigValidationError, ValidationReport};

use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;

/// Load, substitute env vars, apply env overrides and defaults, then validate.
///
/// This is the main entry point for loading a config at runtime.
pub async fn load_and_prepare(path: &Path, env: &HashMap<String, String>) -> Result<SoulForgeConfig> {
    let raw_config = load_config(path).await?;

    let value: Value = serde_json::to_value(&raw_config)
        .context("Failed to serialize config for processing")?;
    let value = resolve_env_vars_with(&value, env).context("Failed to resolve env vars in config")?;
    let config: SoulForgeConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_env_overrides(config, env);

    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if !report.is_valid() {
        bail!("{} config error(s) in {}", report.errors.len(), path.display());
    }

    let config = apply_all_defaults(config);
    if let Ok(snapshot) = serde_json::to_value(&config) {
        tracing::debug!(config = %redact(&snapshot), "Effective deployment config");
    }
    Ok(config)
}
