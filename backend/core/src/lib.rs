pub mod error;
pub mod message;
pub mod session;
pub mod traits;

pub use error::SoulError;
pub use message::{ChatMessage, Role};
pub use session::SessionRecord;
pub use traits::{CompletionClient, KvStore, SessionBackend};
