//! Registry of live conversations, one per identity.
//!
//! The first access for an identity hydrates its conversation from the
//! session backend. Turns for different identities never wait on each other;
//! the registry lock is only held for map lookups and inserts.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use soulforge_core::SessionBackend;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::conversation::{Conversation, ConversationHandle};

pub struct SessionStore {
    sessions: RwLock<HashMap<String, ConversationHandle>>,
    backend: Arc<dyn SessionBackend>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn SessionBackend>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            backend,
        }
    }

    /// Return the conversation for `identity`, creating it on first use.
    ///
    /// Concurrent first calls for the same identity all receive the same
    /// handle. Hydration runs outside the registry lock; if two callers race,
    /// the first insert wins and the other hydrated copy is dropped.
    pub async fn get_or_create(&self, identity: &str) -> ConversationHandle {
        if let Some(handle) = self.sessions.read().await.get(identity) {
            return Arc::clone(handle);
        }

        let hydrated = self.hydrate(identity).await;

        let mut sessions = self.sessions.write().await;
        match sessions.entry(identity.to_string()) {
            Entry::Occupied(existing) => Arc::clone(existing.get()),
            Entry::Vacant(slot) => {
                debug!(identity, messages = hydrated.len(), "Conversation registered");
                Arc::clone(slot.insert(Arc::new(Mutex::new(hydrated))))
            }
        }
    }

    async fn hydrate(&self, identity: &str) -> Conversation {
        match self.backend.load(identity).await {
            Ok(Some(record)) => Conversation::from_record(record),
            Ok(None) => Conversation::new(),
            Err(e) => {
                warn!(identity, error = %e, "Stored session unreadable, starting fresh");
                Conversation::new()
            }
        }
    }

    /// Write the conversation to the backend. Failures are logged and
    /// reported as `false`; the in-memory state is authoritative.
    pub async fn persist(&self, identity: &str, conversation: &Conversation) -> bool {
        match self.backend.save(identity, &conversation.to_record()).await {
            Ok(()) => true,
            Err(e) => {
                warn!(identity, error = %e, "Failed to persist session");
                false
            }
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}
