//! Context window enforcement.
//!
//! A conversation may hold at most `2 * max_turns` messages. When a new user
//! turn pushes it past that, the older exchanges are folded into a summary
//! produced by the completion backend. If summarization is unavailable the
//! oldest messages are dropped instead.

use soulforge_core::{ChatMessage, CompletionClient};
use tracing::{debug, info, warn};

use crate::conversation::Conversation;

/// Instruction sent as the system prompt of a summarization request.
pub const SUMMARY_INSTRUCTION: &str = "Please summarize the following conversation in 1-3 short paragraphs in the same language, preserving key facts and tone. Output only the summary.";

/// Prefix of the synthetic user message carrying a summary.
pub const SUMMARY_PREFIX: &str = "[Previous conversation summary]\n";

/// Synthetic assistant acknowledgement that follows a summary.
pub const SUMMARY_ACK: &str = "好的，我记住了之前的对话要点，我们继续聊吧～";

/// What `ContextWindow::enforce` did to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compaction {
    /// Already within bounds; untouched.
    WithinWindow,
    /// Older messages replaced by a summary exchange.
    Summarized,
    /// Summarization unavailable; oldest messages dropped.
    Truncated { dropped: usize },
}

/// Smallest window that still fits a summarized log (summary, ack, newest turn).
pub const MIN_WINDOW_TURNS: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct ContextWindow {
    max_turns: usize,
}

impl ContextWindow {
    /// Windows smaller than `MIN_WINDOW_TURNS` are raised to it.
    pub fn new(max_turns: usize) -> Self {
        Self {
            max_turns: max_turns.max(MIN_WINDOW_TURNS),
        }
    }

    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    /// Message-count bound, two messages per turn.
    pub fn max_messages(&self) -> usize {
        self.max_turns * 2
    }

    /// Bring the conversation back within bounds. Expects the newest user
    /// turn to be the last message.
    pub async fn enforce(
        &self,
        conversation: &mut Conversation,
        client: &dyn CompletionClient,
    ) -> Compaction {
        let limit = self.max_messages();
        let len = conversation.len();
        if len <= limit {
            return Compaction::WithinWindow;
        }

        if let Some(summary) = summarize(&conversation.messages, client).await {
            if let Some(newest) = conversation.messages.pop() {
                conversation.messages = vec![
                    ChatMessage::user(format!("{SUMMARY_PREFIX}{summary}")),
                    ChatMessage::assistant(SUMMARY_ACK),
                    newest,
                ];
                conversation.latest_summary = Some(summary);
                info!(folded = len - 1, "Conversation summarized");
                return Compaction::Summarized;
            }
        }

        let dropped = len - limit;
        conversation.messages.drain(..dropped);
        info!(dropped, kept = limit, "Conversation truncated");
        Compaction::Truncated { dropped }
    }
}

/// Ask the backend to summarize everything except the newest turn.
///
/// The request window counts the system preamble plus the messages; with two
/// or fewer entries there is nothing worth summarizing.
async fn summarize(messages: &[ChatMessage], client: &dyn CompletionClient) -> Option<String> {
    if messages.len() <= 1 {
        debug!("Window too small to summarize");
        return None;
    }
    let interior = &messages[..messages.len() - 1];

    match client.complete(SUMMARY_INSTRUCTION, interior).await {
        Ok(summary) if !summary.trim().is_empty() => Some(summary),
        Ok(_) => {
            warn!("Summarization returned nothing, falling back to truncation");
            None
        }
        Err(e) => {
            warn!(
                error = %soulforge_logging::redact_sensitive_data(&e.to_string()),
                "Summarization failed, falling back to truncation"
            );
            None
        }
    }
}
