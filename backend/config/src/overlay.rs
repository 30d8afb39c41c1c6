//! Runtime LLM settings overlay.
//!
//! Resolves endpoint, API key, and model through three layers, highest wins:
//! live runtime updates (persisted to the host key-value store), the
//! deployment config, then built-in defaults. Resolution runs on every read.

use std::fmt;
use std::sync::Arc;

use soulforge_core::{KvStore, SoulError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::defaults::{DEFAULT_LLM_MODEL, DEFAULT_LLM_URL};
use crate::schema::LlmConfig;

/// Durable key for each runtime-settable field. The `pluginAgent:` namespace
/// is shared with stores written by earlier bot deployments.
pub const KEY_LLM_URL: &str = "pluginAgent:llm:url";
pub const KEY_LLM_KEY: &str = "pluginAgent:llm:key";
pub const KEY_LLM_MODEL: &str = "pluginAgent:llm:model";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmField {
    Url,
    ApiKey,
    Model,
}

impl LlmField {
    pub const ALL: [LlmField; 3] = [LlmField::Url, LlmField::ApiKey, LlmField::Model];

    pub fn store_key(self) -> &'static str {
        match self {
            LlmField::Url => KEY_LLM_URL,
            LlmField::ApiKey => KEY_LLM_KEY,
            LlmField::Model => KEY_LLM_MODEL,
        }
    }

    /// Trim whitespace; URLs also lose trailing slashes.
    pub fn normalize(self, raw: &str) -> String {
        let trimmed = raw.trim();
        match self {
            LlmField::Url => trimmed.trim_end_matches('/').to_string(),
            LlmField::ApiKey | LlmField::Model => trimmed.to_string(),
        }
    }
}

impl fmt::Display for LlmField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LlmField::Url => "url",
            LlmField::ApiKey => "key",
            LlmField::Model => "model",
        })
    }
}

/// The effective endpoint/credential/model triple used for one completion call.
#[derive(Clone, PartialEq, Eq)]
pub struct LlmSettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_LLM_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_LLM_MODEL.to_string(),
        }
    }
}

impl LlmSettings {
    fn field(&self, field: LlmField) -> &str {
        match field {
            LlmField::Url => &self.base_url,
            LlmField::ApiKey => &self.api_key,
            LlmField::Model => &self.model,
        }
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("base_url", &self.base_url)
            .field("api_key", &crate::redact::mask_secret(&self.api_key))
            .field("model", &self.model)
            .finish()
    }
}

/// One optional value per field.
#[derive(Debug, Clone, Default)]
struct LlmLayer {
    url: Option<String>,
    api_key: Option<String>,
    model: Option<String>,
}

impl LlmLayer {
    fn from_config(config: &LlmConfig) -> Self {
        let mut layer = Self::default();
        let pairs = [
            (LlmField::Url, &config.url),
            (LlmField::ApiKey, &config.api_key),
            (LlmField::Model, &config.model),
        ];
        for (field, value) in pairs {
            if let Some(value) = value {
                layer.set(field, field.normalize(value));
            }
        }
        layer
    }

    fn get(&self, field: LlmField) -> Option<&str> {
        match field {
            LlmField::Url => self.url.as_deref(),
            LlmField::ApiKey => self.api_key.as_deref(),
            LlmField::Model => self.model.as_deref(),
        }
    }

    /// Empty values leave the layer transparent for that field.
    fn set(&mut self, field: LlmField, value: String) {
        let value = Some(value).filter(|v| !v.is_empty());
        match field {
            LlmField::Url => self.url = value,
            LlmField::ApiKey => self.api_key = value,
            LlmField::Model => self.model = value,
        }
    }
}

/// Process-wide LLM settings, constructed once at startup and shared by `Arc`.
pub struct RuntimeConfig {
    defaults: LlmSettings,
    deployment: LlmLayer,
    runtime: RwLock<LlmLayer>,
    store: Option<Arc<dyn KvStore>>,
}

impl RuntimeConfig {
    /// Seed the layers. Values already in `store` become the runtime layer,
    /// so the latest administrative change survives restarts.
    pub fn new(
        defaults: LlmSettings,
        deployment: Option<&LlmConfig>,
        store: Option<Arc<dyn KvStore>>,
    ) -> Self {
        let mut runtime = LlmLayer::default();
        if let Some(store) = &store {
            for field in LlmField::ALL {
                match store.get(field.store_key()) {
                    Ok(Some(value)) => runtime.set(field, field.normalize(&value)),
                    Ok(None) => {}
                    Err(e) => warn!(field = %field, error = %e, "Failed to read stored LLM setting"),
                }
            }
        }

        Self {
            defaults,
            deployment: deployment.map(LlmLayer::from_config).unwrap_or_default(),
            runtime: RwLock::new(runtime),
            store,
        }
    }

    /// Resolve the effective settings.
    pub async fn get(&self) -> LlmSettings {
        let runtime = self.runtime.read().await;
        let resolve = |field: LlmField| {
            runtime
                .get(field)
                .or_else(|| self.deployment.get(field))
                .unwrap_or_else(|| self.defaults.field(field))
                .to_string()
        };
        LlmSettings {
            base_url: resolve(LlmField::Url),
            api_key: resolve(LlmField::ApiKey),
            model: resolve(LlmField::Model),
        }
    }

    /// Apply a live update and persist it.
    ///
    /// Returns the normalized value. The in-memory update stands even when
    /// persisting fails.
    pub async fn set(&self, field: LlmField, value: &str) -> Result<String, SoulError> {
        let value = field.normalize(value);
        if value.is_empty() {
            return Err(SoulError::Config(format!("empty value for llm {field}")));
        }

        self.runtime.write().await.set(field, value.clone());
        info!(field = %field, "LLM setting updated");

        if let Some(store) = &self.store {
            let store = Arc::clone(store);
            let stored = value.clone();
            match tokio::task::spawn_blocking(move || store.set(field.store_key(), &stored)).await {
                Ok(Ok(())) => debug!(field = %field, "LLM setting persisted"),
                Ok(Err(e)) => warn!(field = %field, error = %e, "Failed to persist LLM setting"),
                Err(e) => warn!(field = %field, error = %e, "LLM setting persist task failed"),
            }
        }

        Ok(value)
    }
}
