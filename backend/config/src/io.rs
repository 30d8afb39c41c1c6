//! Config file location and loading.

use crate::schema::SoulForgeConfig;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Config file name within the agent's config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of this agent's directory under `<data>/config/`.
const AGENT_CONFIG_DIR: &str = "agent";

/// Resolve the data directory.
/// Priority: `SOULFORGE_DATA_DIR` env > `./data`
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("SOULFORGE_DATA_DIR") {
        if !dir.trim().is_empty() {
            return PathBuf::from(dir);
        }
    }
    PathBuf::from("data")
}

/// `<data_dir>/config/agent/config.yaml`
pub fn config_file_path(data_dir: &Path) -> PathBuf {
    data_dir
        .join("config")
        .join(AGENT_CONFIG_DIR)
        .join(CONFIG_FILE_NAME)
}

/// Load and parse the config from disk.
///
/// Returns `Ok(Default::default())` if the file doesn't exist or is empty.
pub async fn load_config(path: &Path) -> Result<SoulForgeConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(SoulForgeConfig::default());
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(SoulForgeConfig::default());
    }

    let config: SoulForgeConfig = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_path_layout() {
        let path = config_file_path(Path::new("/srv/bot/data"));
        assert_eq!(path, PathBuf::from("/srv/bot/data/config/agent/config.yaml"));
    }

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("nope.yaml")).await.unwrap();
        assert!(config.llm.is_none());
    }

    #[tokio::test]
    async fn test_empty_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "\n").unwrap();
        assert!(load_config(&path).await.unwrap().session.is_none());
    }

    #[tokio::test]
    async fn test_invalid_yaml_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "llm: [unclosed").unwrap();
        let err = load_config(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config YAML"));
    }
}
