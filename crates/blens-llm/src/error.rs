use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("LLM service returned status {status}")]
    UnexpectedStatus { status: u16 },

    #[error("LLM reply carried no message content")]
    MissingContent,
}
