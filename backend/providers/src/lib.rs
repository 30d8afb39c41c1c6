pub mod content;
pub mod mock;
pub mod openai_compat;

pub use content::extract_content;
pub use mock::{MockCompletionClient, RecordedCall};
pub use openai_compat::OpenAiCompatClient;
