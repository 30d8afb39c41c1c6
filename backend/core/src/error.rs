use thiserror::Error;

/// Top-level error type for the SoulForge runtime.
#[derive(Debug, Error)]
pub enum SoulError {
    #[error("completion transport failed: {0}")]
    Transport(String),

    #[error("API {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response body: {0}")]
    InvalidResponse(String),

    #[error("no choices in response")]
    NoChoices,

    #[error("content neither string nor array: {0}")]
    MalformedContent(String),

    #[error("no text in content")]
    EmptyContent,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SoulError {
    /// True for the failures a completion call can surface to the end user.
    pub fn is_completion_failure(&self) -> bool {
        matches!(
            self,
            SoulError::Transport(_)
                | SoulError::Status { .. }
                | SoulError::InvalidResponse(_)
                | SoulError::NoChoices
                | SoulError::MalformedContent(_)
                | SoulError::EmptyContent
        )
    }
}
