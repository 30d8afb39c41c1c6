//! Persistence backends for SoulForge.
//!
//! - `FileSessionBackend`: one pretty-printed JSON file per identity, replaced atomically
//! - `MemorySessionBackend`: process-local sessions for tests and ephemeral runs
//! - `SqliteKvStore` / `InMemoryKvStore`: the host key-value store

pub mod kv;
pub mod memory;
pub mod session_file;

pub use kv::{InMemoryKvStore, SqliteKvStore};
pub use memory::MemorySessionBackend;
pub use session_file::{identity_file_name, FileSessionBackend};
