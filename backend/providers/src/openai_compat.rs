use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use soulforge_config::{RuntimeConfig, COMPLETION_TIMEOUT};
use soulforge_core::{ChatMessage, CompletionClient, SoulError};

use crate::content::extract_content;

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
///
/// Endpoint, key, and model are resolved from the runtime overlay on every
/// call, so administrative updates apply to the next request.
pub struct OpenAiCompatClient {
    client: Client,
    config: Arc<RuntimeConfig>,
}

impl OpenAiCompatClient {
    pub fn new(config: Arc<RuntimeConfig>) -> Result<Self, SoulError> {
        Self::with_timeout(config, COMPLETION_TIMEOUT)
    }

    pub fn with_timeout(config: Arc<RuntimeConfig>, timeout: Duration) -> Result<Self, SoulError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SoulError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Value,
}

#[async_trait]
impl CompletionClient for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn complete(
        &self,
        system_prompt: &str,
        turns: &[ChatMessage],
    ) -> Result<String, SoulError> {
        let start = Instant::now();
        let settings = self.config.get().await;

        let mut messages = Vec::with_capacity(turns.len() + 1);
        if !system_prompt.is_empty() {
            messages.push(ChatMessage::system(system_prompt));
        }
        messages.extend_from_slice(turns);

        let body = ChatRequest {
            model: &settings.model,
            messages,
        };

        debug!(
            model = %settings.model,
            messages = body.messages.len(),
            "Sending chat completion request"
        );

        let mut request = self
            .client
            .post(format!("{}/chat/completions", settings.base_url.trim_end_matches('/')))
            .json(&body);
        if !settings.api_key.is_empty() {
            request = request.bearer_auth(&settings.api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SoulError::Transport(e.to_string()))?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| SoulError::Transport(e.to_string()))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Completion endpoint returned an error status");
            return Err(SoulError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&raw).map_err(|e| SoulError::InvalidResponse(e.to_string()))?;
        let choice = parsed.choices.into_iter().next().ok_or(SoulError::NoChoices)?;
        let reply = extract_content(&choice.message.content)?;

        debug!(
            model = %settings.model,
            latency_ms = start.elapsed().as_millis() as u64,
            reply_chars = reply.chars().count(),
            "Completion received"
        );
        Ok(reply)
    }
}
