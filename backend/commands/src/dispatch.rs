//! Command dispatch: route detected commands to handlers.
use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::detection::detect_command;
use crate::registry::CommandRegistry;
use crate::types::CommandInvocation;

/// Context passed to every command handler.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub sender_id: String,
    pub is_super_admin: bool,
}

/// Text reply to send back to the invoker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResponse {
    pub text: String,
}

impl CommandResponse {
    pub fn ok(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse>;
}

pub struct CommandDispatcher {
    registry: CommandRegistry,
    handlers: HashMap<String, Arc<dyn CommandHandler>>,
}

impl CommandDispatcher {
    pub fn new(registry: CommandRegistry) -> Self {
        Self { registry, handlers: HashMap::new() }
    }

    pub fn register(&mut self, key: impl Into<String>, handler: Arc<dyn CommandHandler>) {
        self.handlers.insert(key.into(), handler);
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Detect a command in `text`.
    pub fn detect(&self, text: &str) -> Option<CommandInvocation> {
        detect_command(text, &self.registry)
    }

    /// Run a detected command.
    ///
    /// Returns `Ok(None)` when the sender lacks permission; such attempts get
    /// no reply at all.
    pub async fn dispatch(
        &self,
        ctx: &CommandContext,
        inv: &CommandInvocation,
    ) -> Result<Option<CommandResponse>> {
        let admin_only = self
            .registry
            .find_by_key(&inv.key)
            .map(|def| def.admin_only)
            .unwrap_or(true);
        if admin_only && !ctx.is_super_admin {
            debug!(sender = %ctx.sender_id, command = %inv.key, "Ignoring command from non-admin");
            return Ok(None);
        }

        match self.handlers.get(&inv.key) {
            Some(handler) => {
                info!(sender = %ctx.sender_id, command = %inv.key, "Dispatching command");
                handler.handle(ctx, inv).await.map(Some)
            }
            None => Ok(Some(CommandResponse::ok(format!(
                "No handler registered for command {}", inv.key
            )))),
        }
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self { Self::new(CommandRegistry::new()) }
}
