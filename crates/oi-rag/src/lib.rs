//! Diagnostic interpretation pipeline.
//!
//! Turns a `ParsedLog` into retrievable documents, indexes them per
//! conversation, composes grounded prompts for each question, runs them
//! through a chain of generation backends with a rule-based fallback, and
//! tags every answer with a severity band.

pub mod documents;
pub mod embedding;
pub mod error;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod prompt;
pub mod severity;

pub use documents::DocumentBuilder;
pub use embedding::{Embedder, HashingEmbedder};
pub use error::{GenerationError, PipelineError, RetrievalError};
pub use generation::{
    BedrockConfig, BedrockGenerator, Generation, Generator, OllamaConfig, OllamaGenerator,
    RuleBasedGenerator, TieredGenerator,
};
pub use index::RetrievalIndex;
pub use pipeline::{AssistantSettings, DiagnosticAssistant};
pub use prompt::{Intent, PromptComposer};
pub use severity::SeverityClassifier;
