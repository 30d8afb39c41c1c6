//! Inbound turn routing: admin commands first, chat otherwise.

use std::sync::Arc;

use serde::Deserialize;
use soulforge_agent::{strip_mentions, ChatAgent};
use soulforge_commands::{CommandContext, CommandDispatcher};
use tracing::error;

/// One inbound message addressed to the agent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundTurn {
    pub sender_id: String,
    pub text: String,
    #[serde(default)]
    pub is_super_admin: bool,
}

pub struct TurnRouter {
    agent: Arc<ChatAgent>,
    commands: Arc<CommandDispatcher>,
}

impl TurnRouter {
    pub fn new(agent: Arc<ChatAgent>, commands: Arc<CommandDispatcher>) -> Self {
        Self { agent, commands }
    }

    /// Produce the reply for an inbound turn, if any.
    ///
    /// Text that looks like an admin command never reaches the chat path,
    /// whoever sent it.
    pub async fn route(&self, turn: &InboundTurn) -> Option<String> {
        let text = strip_mentions(&turn.text);
        if text.is_empty() {
            return None;
        }

        if let Some(inv) = self.commands.detect(&text) {
            let ctx = CommandContext {
                sender_id: turn.sender_id.clone(),
                is_super_admin: turn.is_super_admin,
            };
            return match self.commands.dispatch(&ctx, &inv).await {
                Ok(response) => response.map(|r| r.text),
                Err(e) => {
                    error!(command = %inv.key, error = %e, "Command handler failed");
                    None
                }
            };
        }

        match self.agent.handle_turn(&turn.sender_id, &text).await {
            Ok(reply) => reply,
            Err(e) => Some(format!("呜…出错了: {e}")),
        }
    }
}
