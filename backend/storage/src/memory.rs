use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use soulforge_core::{SessionBackend, SessionRecord, SoulError};
use tokio::sync::Mutex;

/// Session backend kept in process memory.
///
/// Saves can be made to fail on demand, to exercise best-effort persistence.
#[derive(Default)]
pub struct MemorySessionBackend {
    records: Mutex<HashMap<String, SessionRecord>>,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl MemorySessionBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record as if it had been written by an earlier process.
    pub async fn insert(&self, identity: impl Into<String>, record: SessionRecord) {
        self.records.lock().await.insert(identity.into(), record);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionBackend for MemorySessionBackend {
    async fn load(&self, identity: &str) -> Result<Option<SessionRecord>, SoulError> {
        Ok(self.records.lock().await.get(identity).cloned())
    }

    async fn save(&self, identity: &str, record: &SessionRecord) -> Result<(), SoulError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(SoulError::Storage(format!("save rejected for {identity}")));
        }
        self.records
            .lock()
            .await
            .insert(identity.to_string(), record.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulforge_core::ChatMessage;

    #[tokio::test]
    async fn test_save_then_load() {
        let backend = MemorySessionBackend::new();
        let record = SessionRecord {
            messages: vec![ChatMessage::user("hi")],
            latest_summary: None,
        };
        backend.save("u", &record).await.unwrap();
        assert_eq!(backend.load("u").await.unwrap(), Some(record));
        assert_eq!(backend.save_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_saves() {
        let backend = MemorySessionBackend::new();
        backend.set_fail_saves(true);
        assert!(backend.save("u", &SessionRecord::default()).await.is_err());
        assert_eq!(backend.load("u").await.unwrap(), None);
        assert_eq!(backend.save_count(), 0);
    }
}
