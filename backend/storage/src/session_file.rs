//! File-backed session persistence.
//!
//! Layout: `<dir>/<encoded identity>.json`. Writes go to a temp file that is
//! renamed over the target, so a reader never sees a partial record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use soulforge_core::{SessionBackend, SessionRecord, SoulError};
use tokio::fs;
use tracing::debug;

pub struct FileSessionBackend {
    dir: PathBuf,
}

impl FileSessionBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Location of the record for `identity`.
    pub fn path_for(&self, identity: &str) -> PathBuf {
        self.dir.join(identity_file_name(identity))
    }
}

/// Deterministic, injective file name for an identity.
///
/// ASCII alphanumerics, `-`, `_` and `.` are kept; every other byte becomes
/// `%XX`, so no identity can escape the session directory.
pub fn identity_file_name(identity: &str) -> String {
    let mut name = String::with_capacity(identity.len() + 5);
    for byte in identity.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' => name.push(byte as char),
            other => name.push_str(&format!("%{other:02X}")),
        }
    }
    name.push_str(".json");
    name
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> SoulError {
    SoulError::Storage(format!("{action} {}: {e}", path.display()))
}

#[async_trait]
impl SessionBackend for FileSessionBackend {
    async fn load(&self, identity: &str) -> Result<Option<SessionRecord>, SoulError> {
        let path = self.path_for(identity);
        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("failed to read", &path, e)),
        };

        let record: SessionRecord = serde_json::from_str(&raw).map_err(|e| {
            SoulError::Storage(format!("corrupt session record {}: {e}", path.display()))
        })?;
        debug!(path = %path.display(), messages = record.messages.len(), "Session loaded");
        Ok(Some(record))
    }

    async fn save(&self, identity: &str, record: &SessionRecord) -> Result<(), SoulError> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("failed to create", &self.dir, e))?;

        let json = serde_json::to_string_pretty(record)
            .map_err(|e| SoulError::Storage(format!("failed to serialize session: {e}")))?;

        let path = self.path_for(identity);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json.as_bytes())
            .await
            .map_err(|e| io_error("failed to write", &tmp_path, e))?;
        fs::rename(&tmp_path, &path)
            .await
            .map_err(|e| io_error("failed to replace", &path, e))?;

        debug!(path = %path.display(), messages = record.messages.len(), "Session saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use soulforge_core::ChatMessage;

    fn record() -> SessionRecord {
        SessionRecord {
            messages: vec![
                ChatMessage::user("[Previous conversation summary]\n聊了天气"),
                ChatMessage::assistant("好的，我记住了之前的对话要点，我们继续聊吧～"),
                ChatMessage::user("明天呢？"),
            ],
            latest_summary: Some("聊了天气".into()),
        }
    }

    #[tokio::test]
    async fn test_persist_then_load_is_identical() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSessionBackend::new(dir.path());
        backend.save("10001", &record()).await.unwrap();

        let loaded = backend.load("10001").await.unwrap().unwrap();
        assert_eq!(loaded, record());
    }

    #[tokio::test]
    async fn test_missing_record_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSessionBackend::new(dir.path());
        assert!(backend.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_corrupt_record_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSessionBackend::new(dir.path());
        std::fs::write(backend.path_for("42"), "{ not json").unwrap();
        let err = backend.load("42").await.unwrap_err();
        assert!(matches!(err, SoulError::Storage(_)));
    }

    #[tokio::test]
    async fn test_save_creates_nested_dir_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSessionBackend::new(dir.path().join("llm-playground").join("sessions"));
        backend.save("u1", &record()).await.unwrap();

        let shorter = SessionRecord {
            messages: vec![ChatMessage::user("重新开始")],
            latest_summary: None,
        };
        backend.save("u1", &shorter).await.unwrap();

        assert_eq!(backend.load("u1").await.unwrap().unwrap(), shorter);
        assert!(!backend.path_for("u1").with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_is_human_readable() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileSessionBackend::new(dir.path());
        backend.save("u2", &record()).await.unwrap();
        let raw = std::fs::read_to_string(backend.path_for("u2")).unwrap();
        assert!(raw.contains("\"latest_summary\": \"聊了天气\""));
        assert!(raw.contains("\"role\": \"assistant\""));
    }

    #[test]
    fn test_identity_encoding_stays_in_dir() {
        assert_eq!(identity_file_name("123456"), "123456.json");
        assert_eq!(identity_file_name("../etc/passwd"), "..%2Fetc%2Fpasswd.json");
        assert_eq!(identity_file_name("a%2Fb"), "a%252Fb.json");
        assert_ne!(identity_file_name("a/b"), identity_file_name("a_b"));
    }
}
