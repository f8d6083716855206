//! AWS Bedrock generation backend over the model-agnostic Converse API
//! (works with Nova Lite, Claude, etc.).

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, ConverseOutput, InferenceConfiguration, Message,
    SystemContentBlock,
};
use std::time::Duration;
use tokio::time::timeout;

use super::Generator;
use crate::error::{GenerationError, GenerationResult};

const SYSTEM_PROMPT: &str = "You explain OBD-II vehicle diagnostics to car owners. \
Answer only from the diagnostic data in the user's message and keep the language plain.";

const DEFAULT_MODEL_ID: &str = "us.amazon.nova-lite-v1:0";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_TOKENS: i32 = 1024;

/// Configuration for the Bedrock backend.
#[derive(Debug, Clone)]
pub struct BedrockConfig {
    /// Bedrock model ID (e.g., "us.amazon.nova-lite-v1:0").
    pub model_id: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl BedrockConfig {
    pub fn new(model_id: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model_id: model_id.into(),
            timeout,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let model_id = std::env::var("BEDROCK_MODEL_ID").unwrap_or_else(|_| DEFAULT_MODEL_ID.into());
        let timeout_secs: u64 = std::env::var("BEDROCK_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Self::new(model_id, Duration::from_secs(timeout_secs))
    }
}

impl Default for BedrockConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_ID, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

/// Bedrock Converse API generator.
pub struct BedrockGenerator {
    client: BedrockClient,
    config: BedrockConfig,
}

impl BedrockGenerator {
    /// Create a generator with a pre-built Bedrock client.
    pub fn new(client: BedrockClient, config: BedrockConfig) -> Self {
        Self { client, config }
    }

    async fn call_converse(&self, prompt: &str) -> GenerationResult<String> {
        let user_message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| GenerationError::Backend(format!("failed to build message: {e}")))?;

        let response = self
            .client
            .converse()
            .model_id(&self.config.model_id)
            .system(SystemContentBlock::Text(SYSTEM_PROMPT.to_string()))
            .messages(user_message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(MAX_TOKENS)
                    .temperature(0.7)
                    .build(),
            )
            .send()
            .await
            .map_err(|e| GenerationError::Backend(format!("bedrock converse error: {e}")))?;

        let output = response.output().ok_or(GenerationError::EmptyResponse)?;
        response_text(output).ok_or(GenerationError::EmptyResponse)
    }
}

#[async_trait]
impl Generator for BedrockGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        match timeout(self.config.timeout, self.call_converse(prompt)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "bedrock generation failed");
                Err(e)
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.config.timeout.as_secs(),
                    "bedrock generation timed out"
                );
                Err(GenerationError::Timeout(self.config.timeout.as_secs()))
            }
        }
    }

    fn tier_name(&self) -> &str {
        "bedrock"
    }
}

/// Concatenated text blocks of an assistant message, or `None` when the
/// output carries no text.
fn response_text(output: &ConverseOutput) -> Option<String> {
    let ConverseOutput::Message(msg) = output else {
        return None;
    };
    let text = msg
        .content()
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Text(t) => Some(t.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
