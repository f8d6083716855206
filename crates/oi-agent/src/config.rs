//! Assistant configuration, loadable from TOML.

use serde::Deserialize;
use std::time::Duration;

use oi_rag::{AssistantSettings, OllamaConfig};

/// Top-level configuration for the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Per-tier generation cap in seconds.
    #[serde(default = "default_generation_timeout")]
    pub generation_timeout_secs: u64,
    /// Earlier turns restated in each prompt.
    #[serde(default = "default_history_turns")]
    pub history_turns: usize,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    /// Local Ollama backend. Optional, defaults to enabled.
    #[serde(default)]
    pub ollama: OllamaConfig,
    /// Cloud Bedrock backend. Optional, defaults to disabled.
    #[serde(default)]
    pub bedrock: BedrockSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RetrievalConfig {
    /// Documents retrieved per question.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BedrockSettings {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_bedrock_model")]
    pub model_id: String,
    /// AWS region. None uses the SDK's default provider chain.
    #[serde(default)]
    pub region: Option<String>,
}

fn default_generation_timeout() -> u64 {
    30
}
fn default_history_turns() -> usize {
    6
}
fn default_top_k() -> usize {
    5
}
fn default_bedrock_model() -> String {
    "us.amazon.nova-lite-v1:0".into()
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
        }
    }
}

impl Default for BedrockSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            model_id: default_bedrock_model(),
            region: None,
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            generation_timeout_secs: default_generation_timeout(),
            history_turns: default_history_turns(),
            retrieval: RetrievalConfig::default(),
            ollama: OllamaConfig::default(),
            bedrock: BedrockSettings::default(),
        }
    }
}

impl AssistantConfig {
    /// Load config from a TOML file path.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Pipeline tunables derived from this config.
    pub fn settings(&self) -> AssistantSettings {
        AssistantSettings {
            top_k: self.retrieval.top_k,
            history_turns: self.history_turns,
            generation_timeout: self.generation_timeout(),
        }
    }
}
