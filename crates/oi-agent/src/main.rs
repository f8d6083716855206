//! OBD Insight agent: upload an OBD-II log and ask about it.
//!
//! ```text
//! oi-agent <log.csv|log.tsv> [question...]
//! ```
//!
//! Without a question the agent prints a health summary. Configuration is
//! read from the TOML file named by `OBD_INSIGHT_CONFIG`, if set.

use std::sync::Arc;

use serde::Serialize;
use tracing_subscriber::EnvFilter;

use oi_agent::config::AssistantConfig;
use oi_agent::runtime;
use oi_agent::session::{DiagnosticSession, UploadReport};
use oi_protocol::Answer;
use oi_telemetry::{FaultCodeKb, FileLogSource, MetricCatalog, TelemetryParser};

#[derive(Serialize)]
struct Output {
    upload: UploadReport,
    question: String,
    answer: Answer,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "oi-agent starting");

    // ── Arguments ───────────────────────────────────────────────
    let mut args = std::env::args().skip(1);
    let Some(log_path) = args.next() else {
        anyhow::bail!("usage: oi-agent <log.csv|log.tsv> [question...]");
    };
    let question = args.collect::<Vec<_>>().join(" ");

    // ── Load config ─────────────────────────────────────────────
    let config = match std::env::var("OBD_INSIGHT_CONFIG") {
        Ok(path) => {
            let config = AssistantConfig::from_file(&path)?;
            tracing::info!(path = %path, "config loaded");
            config
        }
        Err(_) => {
            tracing::info!("no config file, using defaults");
            AssistantConfig::default()
        }
    };

    // ── Pipeline ────────────────────────────────────────────────
    let catalog = Arc::new(MetricCatalog::standard());
    let kb = Arc::new(FaultCodeKb::standard());
    tracing::info!(
        metrics = catalog.definitions().len(),
        fault_codes = kb.len(),
        "knowledge loaded"
    );
    let assistant = Arc::new(runtime::build_assistant(&config, catalog.clone(), kb.clone()).await?);
    let mut session = DiagnosticSession::new(TelemetryParser::new(catalog, kb), assistant);

    // ── Upload + ask ────────────────────────────────────────────
    let upload = session.upload(&log_path, &FileLogSource).await?;
    let (question, answer) = if question.trim().is_empty() {
        (oi_rag::prompt::SUMMARY_QUESTION.to_string(), session.summary().await)
    } else {
        let answer = session.ask(&question).await?;
        (question, answer)
    };

    let output = Output {
        upload,
        question,
        answer,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    session.close().await;
    tracing::info!("oi-agent stopped");
    Ok(())
}
