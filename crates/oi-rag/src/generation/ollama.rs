//! Ollama local generation client.
//!
//! Calls the Ollama HTTP API (`/api/chat`) with the composed prompt as a
//! single user message and returns the assistant's reply text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Generator;
use crate::error::{GenerationError, GenerationResult};

/// Configuration for the local Ollama endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OllamaConfig {
    /// Ollama HTTP API base URL.
    #[serde(default = "default_host")]
    pub host: String,
    /// Model to generate with.
    #[serde(default = "default_model")]
    pub model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether this tier is tried at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_host() -> String {
    "http://localhost:11434".into()
}
fn default_model() -> String {
    "granite3.3:2b".into()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_enabled() -> bool {
    true
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
        }
    }
}

/// Ollama chat API request body.
#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama chat API response (only fields we need).
#[derive(Deserialize)]
struct ChatResponse {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Generator backed by a local Ollama server.
pub struct OllamaGenerator {
    client: reqwest::Client,
    config: OllamaConfig,
}

impl OllamaGenerator {
    pub fn new(config: OllamaConfig) -> GenerationResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> GenerationResult<String> {
        if !self.config.enabled {
            return Err(GenerationError::Disabled("ollama".into()));
        }

        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
            options: ChatOptions {
                temperature: 0.7,
                num_predict: 1024,
            },
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => {
                tracing::warn!(error = %e, "ollama request timed out");
                return Err(GenerationError::Timeout(self.config.timeout_secs));
            }
            Err(e) => {
                tracing::warn!(error = %e, "ollama request failed");
                return Err(e.into());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "ollama returned non-200");
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, "failed to parse ollama response body");
            GenerationError::Backend(format!("invalid ollama response: {e}"))
        })?;

        let content = chat.message.map(|m| m.content).unwrap_or_default();
        if content.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(content.trim().to_string())
    }

    fn tier_name(&self) -> &str {
        "ollama"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Helper: build an Ollama chat response body.
    fn ollama_response(content: &str) -> serde_json::Value {
        serde_json::json!({
            "model": "granite3.3:2b",
            "message": {
                "role": "assistant",
                "content": content
            },
            "done": true
        })
    }

    fn generator_for(server: &MockServer) -> OllamaGenerator {
        OllamaGenerator::new(OllamaConfig {
            host: server.uri(),
            model: "granite3.3:2b".into(),
            timeout_secs: 2,
            enabled: true,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn generate_returns_reply_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "granite3.3:2b",
                "stream": false
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ollama_response("  Your coolant is running hot.\n")),
            )
            .mount(&server)
            .await;

        let text = generator_for(&server).generate("PROMPT").await.unwrap();
        assert_eq!(text, "Your coolant is running hot.");
    }

    #[tokio::test]
    async fn prompt_sent_as_user_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "user", "content": "What does P0300 mean?"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(ollama_response("A misfire.")))
            .expect(1)
            .mount(&server)
            .await;

        let text = generator_for(&server)
            .generate("What does P0300 mean?")
            .await
            .unwrap();
        assert_eq!(text, "A misfire.");
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let err = generator_for(&server).generate("hi").await.unwrap_err();
        match err {
            GenerationError::Status { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_reply_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ollama_response("   ")))
            .mount(&server)
            .await;

        let err = generator_for(&server).generate("hi").await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
    }

    #[tokio::test]
    async fn garbage_body_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = generator_for(&server).generate("hi").await.unwrap_err();
        assert!(matches!(err, GenerationError::Backend(_)));
    }

    #[tokio::test]
    async fn slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ollama_response("late"))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;

        // Client timeout is 2s, mock delays 10s
        let err = generator_for(&server).generate("hi").await.unwrap_err();
        assert!(matches!(err, GenerationError::Timeout(2)));
    }

    #[tokio::test]
    async fn unreachable_host_is_http_error() {
        let generator = OllamaGenerator::new(OllamaConfig {
            host: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();
        let err = generator.generate("hi").await.unwrap_err();
        assert!(matches!(err, GenerationError::Http(_)));
    }

    #[tokio::test]
    async fn disabled_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ollama_response("x")))
            .expect(0)
            .mount(&server)
            .await;

        let generator = OllamaGenerator::new(OllamaConfig {
            host: server.uri(),
            enabled: false,
            ..Default::default()
        })
        .unwrap();
        let err = generator.generate("hi").await.unwrap_err();
        assert!(matches!(err, GenerationError::Disabled(_)));
    }

    #[test]
    fn config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost:11434");
        assert_eq!(config.model, "granite3.3:2b");
        assert_eq!(config.timeout_secs, 30);
        assert!(config.enabled);
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let config: OllamaConfig =
            serde_json::from_str(r#"{"host": "http://192.168.1.50:11434"}"#).unwrap();
        assert_eq!(config.host, "http://192.168.1.50:11434");
        assert_eq!(config.model, "granite3.3:2b");
        assert!(config.enabled);
    }
}
