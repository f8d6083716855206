//! Backend wiring: config → generation tiers → `DiagnosticAssistant`.

use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_sdk_bedrockruntime::config::Region;

use oi_rag::{
    BedrockConfig, BedrockGenerator, DiagnosticAssistant, Generator, OllamaGenerator,
};
use oi_telemetry::{FaultCodeKb, MetricCatalog};

use crate::config::AssistantConfig;

/// Enabled backends in fallback order: Ollama, then Bedrock. The
/// rule-based tier is always appended by the assistant itself.
pub async fn build_backends(config: &AssistantConfig) -> anyhow::Result<Vec<Arc<dyn Generator>>> {
    let mut tiers: Vec<Arc<dyn Generator>> = Vec::new();

    if config.ollama.enabled {
        tracing::info!(
            host = %config.ollama.host,
            model = %config.ollama.model,
            "ollama backend enabled"
        );
        tiers.push(Arc::new(OllamaGenerator::new(config.ollama.clone())?));
    } else {
        tracing::info!("ollama backend disabled");
    }

    if config.bedrock.enabled {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.bedrock.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;
        let client = aws_sdk_bedrockruntime::Client::new(&sdk_config);
        tracing::info!(model_id = %config.bedrock.model_id, "bedrock backend enabled");
        tiers.push(Arc::new(BedrockGenerator::new(
            client,
            BedrockConfig::new(config.bedrock.model_id.clone(), config.generation_timeout()),
        )));
    } else {
        tracing::info!("bedrock backend disabled");
    }

    Ok(tiers)
}

/// Assistant over the given metric catalog and knowledge base. Pass the
/// same tables the upload parser uses.
pub async fn build_assistant(
    config: &AssistantConfig,
    catalog: Arc<MetricCatalog>,
    kb: Arc<FaultCodeKb>,
) -> anyhow::Result<DiagnosticAssistant> {
    let backends = build_backends(config).await?;
    Ok(DiagnosticAssistant::new(catalog, kb, backends, config.settings()))
}
