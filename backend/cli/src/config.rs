/// HTTP server settings for `soulforge serve`.
#[derive(Debug, Clone)]
pub struct ServeConfig {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl ServeConfig {
    /// Load from `SOULFORGE_BIND_ADDRESS` / `SOULFORGE_PORT`, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(addr) = std::env::var("SOULFORGE_BIND_ADDRESS") {
            config.bind_address = addr;
        }
        if let Some(port) = std::env::var("SOULFORGE_PORT").ok().and_then(|p| p.parse().ok()) {
            config.port = port;
        }
        config
    }
}
