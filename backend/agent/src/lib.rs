//! SoulForge chat agent.
//!
//! Owns per-identity conversations, keeps each one inside its context
//! window, and runs a single user turn against the completion backend.

pub mod chat;
pub mod context_window;
pub mod conversation;
pub mod mention;
pub mod persona;
pub mod session_store;

pub use chat::ChatAgent;
pub use context_window::{Compaction, ContextWindow};
pub use conversation::{Conversation, ConversationHandle};
pub use mention::strip_mentions;
pub use persona::PromptBuilder;
pub use session_store::SessionStore;
