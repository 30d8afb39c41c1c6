use async_trait::async_trait;

use crate::error::SoulError;
use crate::message::ChatMessage;
use crate::session::SessionRecord;

/// Turns an ordered list of chat turns into one reply.
///
/// Implementations never retry; every failure is returned to the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Client name for logs (e.g., "openai-compat", "mock").
    fn name(&self) -> &str;

    /// Send `system_prompt` followed by `turns` and return the reply text.
    async fn complete(&self, system_prompt: &str, turns: &[ChatMessage])
        -> Result<String, SoulError>;
}

/// Per-identity durable session persistence.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Load the record for `identity`. `Ok(None)` means no prior session.
    async fn load(&self, identity: &str) -> Result<Option<SessionRecord>, SoulError>;

    /// Replace the stored record for `identity` with `record`.
    async fn save(&self, identity: &str, record: &SessionRecord) -> Result<(), SoulError>;
}

/// Generic string key-value store owned by the host (bot cache/database).
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SoulError>;

    fn set(&self, key: &str, value: &str) -> Result<(), SoulError>;
}
