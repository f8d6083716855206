//! Shared test harness for E2E tests.
//!
//! Wires the real parser, pipeline and agent session together, with a
//! `wiremock` server standing in for Ollama and `MockLogSource` standing in
//! for uploaded files.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use oi_agent::config::AssistantConfig;
use oi_agent::runtime;
use oi_agent::session::DiagnosticSession;
use oi_rag::DiagnosticAssistant;
use oi_telemetry::{FaultCodeKb, MetricCatalog, MockLogSource, TelemetryParser};

pub use oi_telemetry::mock::{FAULTY_SAMPLE_PATH as FAULTY, HEALTHY_SAMPLE_PATH as HEALTHY};

/// End-to-end harness: config → assistant → session, over mock uploads.
pub struct TestHarness {
    pub config: AssistantConfig,
    pub assistant: Arc<DiagnosticAssistant>,
    pub source: MockLogSource,
    /// Mock Ollama server, when the harness has one.
    pub ollama: Option<MockServer>,
}

impl TestHarness {
    /// No generation backends: every answer comes from the rules tier.
    pub async fn offline() -> Self {
        let mut config = AssistantConfig::default();
        config.ollama.enabled = false;
        Self::build(config, None).await
    }

    /// Ollama answers every prompt with `reply`.
    pub async fn with_ollama_reply(reply: &str) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ollama_body(reply)))
            .mount(&server)
            .await;
        Self::with_ollama_server(server).await
    }

    /// Ollama answers with HTTP 500.
    pub async fn with_ollama_down() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model crashed"))
            .mount(&server)
            .await;
        Self::with_ollama_server(server).await
    }

    /// Ollama answers only after `delay`; the generation cap is 1s.
    pub async fn with_slow_ollama(delay: Duration) -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ollama_body("finally"))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
        let mut config = ollama_config(&server);
        config.generation_timeout_secs = 1;
        Self::build(config, Some(server)).await
    }

    /// Harness over a caller-prepared mock server.
    pub async fn with_ollama_server(server: MockServer) -> Self {
        let config = ollama_config(&server);
        Self::build(config, Some(server)).await
    }

    async fn build(config: AssistantConfig, ollama: Option<MockServer>) -> Self {
        let assistant = runtime::build_assistant(
            &config,
            Arc::new(MetricCatalog::standard()),
            Arc::new(FaultCodeKb::standard()),
        )
        .await
        .unwrap();
        Self {
            config,
            assistant: Arc::new(assistant),
            source: MockLogSource::with_samples(),
            ollama,
        }
    }

    /// A fresh conversation over the harness's assistant.
    pub fn session(&self) -> DiagnosticSession {
        let parser = TelemetryParser::new(
            self.assistant.catalog().clone(),
            self.assistant.knowledge_base().clone(),
        );
        DiagnosticSession::new(parser, self.assistant.clone())
    }

    /// A conversation with `path` already uploaded.
    pub async fn session_with(&self, path: &str) -> DiagnosticSession {
        let mut session = self.session();
        session.upload(path, &self.source).await.unwrap();
        session
    }

    /// Add an upload with custom content.
    pub fn add_file(&mut self, path: &str, content: &str) {
        self.source.add_file(path, content);
    }

    /// Bodies of every request Ollama received, as strings.
    pub async fn ollama_prompts(&self) -> Vec<String> {
        let Some(server) = &self.ollama else {
            return Vec::new();
        };
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| {
                let body: serde_json::Value = serde_json::from_slice(&r.body).unwrap();
                body["messages"][0]["content"].as_str().unwrap_or_default().to_string()
            })
            .collect()
    }
}

fn ollama_config(server: &MockServer) -> AssistantConfig {
    let mut config = AssistantConfig::default();
    config.ollama.host = server.uri();
    config.ollama.timeout_secs = 5;
    config
}

/// Ollama chat response body.
pub fn ollama_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "granite3.3:2b",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}
