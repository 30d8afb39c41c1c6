//! Single-turn chat execution.
//!
//! A turn holds the identity's conversation lock from the moment the user
//! message is appended until the reply is recorded, so turns for one
//! identity are strictly serialized.

use std::sync::Arc;

use soulforge_core::{ChatMessage, CompletionClient, SoulError};
use soulforge_logging::redact_sensitive_data;
use tracing::{debug, info, instrument, warn};

use crate::context_window::{Compaction, ContextWindow};
use crate::mention::strip_mentions;
use crate::session_store::SessionStore;

pub struct ChatAgent {
    sessions: Arc<SessionStore>,
    client: Arc<dyn CompletionClient>,
    window: ContextWindow,
    system_prompt: String,
}

impl ChatAgent {
    pub fn new(
        sessions: Arc<SessionStore>,
        client: Arc<dyn CompletionClient>,
        window: ContextWindow,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            sessions,
            client,
            window,
            system_prompt: system_prompt.into(),
        }
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Run one user turn and return the assistant reply.
    ///
    /// Returns `Ok(None)` when nothing is left after stripping mentions. On a
    /// completion failure the user message stays in memory without a reply
    /// and nothing is persisted.
    #[instrument(skip(self, text), fields(identity = %identity))]
    pub async fn handle_turn(&self, identity: &str, text: &str) -> Result<Option<String>, SoulError> {
        let text = strip_mentions(text);
        if text.is_empty() {
            debug!("Empty turn after stripping mentions, ignoring");
            return Ok(None);
        }

        let handle = self.sessions.get_or_create(identity).await;
        let mut conversation = handle.lock().await;

        conversation.push(ChatMessage::user(text));
        if self.window.enforce(&mut conversation, self.client.as_ref()).await == Compaction::Summarized {
            self.sessions.persist(identity, &conversation).await;
        }

        let reply = match self
            .client
            .complete(&self.system_prompt, &conversation.messages)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                warn!(
                    provider = self.client.name(),
                    error = %redact_sensitive_data(&e.to_string()),
                    "Completion failed"
                );
                return Err(e);
            }
        };

        conversation.push(ChatMessage::assistant(reply.clone()));
        self.sessions.persist(identity, &conversation).await;
        info!(messages = conversation.len(), "Turn completed");
        Ok(Some(reply))
    }
}
