//! Answer generation backends.
//!
//! Every backend implements [`Generator`]: one prompt in, one completion out.
//! Backends are chained by [`TieredGenerator`]:
//! - **Ollama** (local): small model served over HTTP, zero API cost.
//! - **Bedrock** (cloud): Converse API, used when the local model is down.
//! - **Rules** (in-process): deterministic answer built straight from the
//!   parsed log. Never fails, so a question always gets an answer.

pub mod bedrock;
pub mod ollama;
pub mod rules;
pub mod tiered;

use async_trait::async_trait;

use crate::error::GenerationResult;

/// A text generation backend.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Complete `prompt`. Errors are recovered by the caller's fallback.
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;

    /// Name of this tier (for logging and `Answer::generated_by`).
    fn tier_name(&self) -> &str;
}

/// Completion text plus the tier that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub text: String,
    pub tier: String,
}

pub use bedrock::{BedrockConfig, BedrockGenerator};
pub use ollama::{OllamaConfig, OllamaGenerator};
pub use rules::{RULES_TIER, RuleBasedGenerator};
pub use tiered::TieredGenerator;
