//! Built-in command handlers.
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use soulforge_config::{LlmField, RuntimeConfig};
use tracing::warn;

use crate::dispatch::{CommandContext, CommandHandler, CommandResponse};
use crate::types::CommandInvocation;

// ---------------------------------------------------------------------------
// /setLLMUrl, /setLLMKey, /setLLMModel
// ---------------------------------------------------------------------------

/// Updates one runtime LLM setting.
pub struct SetLlmHandler {
    pub field: LlmField,
    pub usage: String,
    pub config: Arc<RuntimeConfig>,
}

impl SetLlmHandler {
    fn confirmation(&self, value: &str) -> String {
        match self.field {
            LlmField::Url => format!("已设置 LLM URL: {value}"),
            LlmField::ApiKey => "已设置 LLM API Key（已隐藏）".to_string(),
            LlmField::Model => format!("已设置 LLM 模型: {value}"),
        }
    }
}

#[async_trait]
impl CommandHandler for SetLlmHandler {
    async fn handle(&self, _ctx: &CommandContext, inv: &CommandInvocation) -> Result<CommandResponse> {
        if inv.args.is_empty() {
            return Ok(CommandResponse::ok(self.usage.clone()));
        }
        match self.config.set(self.field, &inv.args).await {
            Ok(value) => Ok(CommandResponse::ok(self.confirmation(&value))),
            Err(e) => {
                warn!(field = %self.field, error = %e, "Rejected LLM setting");
                Ok(CommandResponse::ok(self.usage.clone()))
            }
        }
    }
}
