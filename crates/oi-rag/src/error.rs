//! Error types for retrieval, generation and the assembled pipeline.

use thiserror::Error;
use uuid::Uuid;

/// Retrieval index errors.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// Queried a conversation that was never indexed. Indicates a caller
    /// ordering bug, not a user-facing condition.
    #[error("no retrieval index for conversation {0}")]
    IndexNotFound(Uuid),
}

/// Failures of a single generation backend. Always recovered by falling
/// through to the next tier.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("backend timed out after {0}s")]
    Timeout(u64),

    #[error("backend error: {0}")]
    Backend(String),

    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("backend disabled: {0}")]
    Disabled(String),

    #[error("all generation tiers failed")]
    Exhausted,
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        Self::Http(e.to_string())
    }
}

/// Errors surfaced by `DiagnosticAssistant`.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),
}

pub type RetrievalResult<T> = Result<T, RetrievalError>;
pub type GenerationResult<T> = Result<T, GenerationError>;
pub type PipelineResult<T> = Result<T, PipelineError>;
