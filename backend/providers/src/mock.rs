use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use soulforge_core::{ChatMessage, CompletionClient, SoulError};

/// One request seen by the mock.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub turns: Vec<ChatMessage>,
}

/// A completion client that returns scripted replies and records requests.
///
/// Scripted results are consumed in order; once the script runs dry every
/// call gets the fallback.
pub struct MockCompletionClient {
    name: String,
    script: Mutex<VecDeque<Result<String, SoulError>>>,
    fallback: Result<String, String>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockCompletionClient {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            fallback: Ok("Mock response".to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `response` whenever the script is empty.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fallback = Ok(response.into());
        self
    }

    /// Fail with a transport error whenever the script is empty.
    pub fn failing(mut self, reason: impl Into<String>) -> Self {
        self.fallback = Err(reason.into());
        self
    }

    /// Queue one result.
    pub fn push(&self, result: Result<String, SoulError>) -> &Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(result);
        }
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(
        &self,
        system_prompt: &str,
        turns: &[ChatMessage],
    ) -> Result<String, SoulError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                system_prompt: system_prompt.to_string(),
                turns: turns.to_vec(),
            });
        }

        let scripted = self.script.lock().ok().and_then(|mut s| s.pop_front());
        match scripted {
            Some(result) => result,
            None => self.fallback.clone().map_err(SoulError::Transport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let mock = MockCompletionClient::new("mock").with_response("later");
        mock.push(Ok("first".into()))
            .push(Err(SoulError::NoChoices));

        let turns = [ChatMessage::user("q")];
        assert_eq!(mock.complete("sys", &turns).await.unwrap(), "first");
        assert!(matches!(mock.complete("sys", &turns).await, Err(SoulError::NoChoices)));
        assert_eq!(mock.complete("sys", &turns).await.unwrap(), "later");

        let calls = mock.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[0].system_prompt, "sys");
        assert_eq!(calls[0].turns, turns.to_vec());
    }

    #[tokio::test]
    async fn test_failing_fallback() {
        let mock = MockCompletionClient::new("mock").failing("offline");
        let err = mock.complete("", &[]).await.unwrap_err();
        assert_eq!(err.to_string(), "completion transport failed: offline");
    }
}
