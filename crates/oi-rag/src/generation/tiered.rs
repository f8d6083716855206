//! Tiered generation: try each backend in order until one answers.
//!
//! Every configured tier runs under the same timeout. The rule-based
//! fallback handed to `run_with_fallback` runs uncapped. An error, a timeout
//! or a blank completion all count as a miss and move on to the next tier.
//! The tier that produced the text is recorded in `Generation.tier`.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::{Generation, Generator};
use crate::error::{GenerationError, GenerationResult};

/// Ordered chain of generation backends.
pub struct TieredGenerator {
    tiers: Vec<Arc<dyn Generator>>,
    timeout: Duration,
}

impl TieredGenerator {
    pub fn new(tiers: Vec<Arc<dyn Generator>>, timeout: Duration) -> Self {
        Self { tiers, timeout }
    }

    pub fn tier_names(&self) -> Vec<&str> {
        self.tiers.iter().map(|t| t.tier_name()).collect()
    }

    /// Run the configured tiers in order.
    pub async fn run(&self, prompt: &str) -> GenerationResult<Generation> {
        for tier in &self.tiers {
            let name = tier.tier_name();
            match timeout(self.timeout, tier.generate(prompt)).await {
                Ok(Ok(text)) => {
                    if let Some(generation) = accept(name, &text) {
                        return Ok(generation);
                    }
                }
                Ok(Err(e)) => tracing::warn!(tier = name, error = %e, "tier failed"),
                Err(_) => tracing::warn!(
                    tier = name,
                    timeout_secs = self.timeout.as_secs(),
                    "tier timed out"
                ),
            }
            tracing::debug!(tier = name, "generation tier missed, falling back");
        }
        Err(GenerationError::Exhausted)
    }

    /// Run the configured tiers, then `fallback` if all of them miss.
    /// The fallback is not subject to the per-tier timeout.
    pub async fn run_with_fallback(
        &self,
        prompt: &str,
        fallback: &dyn Generator,
    ) -> GenerationResult<Generation> {
        if let Ok(generation) = self.run(prompt).await {
            return Ok(generation);
        }
        let name = fallback.tier_name();
        let text = fallback.generate(prompt).await?;
        accept(name, &text).ok_or(GenerationError::Exhausted)
    }
}

/// Trimmed text tagged with its tier, or `None` for a blank completion.
fn accept(tier: &str, text: &str) -> Option<Generation> {
    let text = text.trim();
    if text.is_empty() {
        tracing::warn!(tier, "tier returned blank text");
        return None;
    }
    Some(Generation {
        text: text.to_string(),
        tier: tier.to_string(),
    })
}

#[async_trait]
impl Generator for TieredGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        self.run(prompt).await.map(|g| g.text)
    }

    fn tier_name(&self) -> &str {
        "tiered"
    }
}
