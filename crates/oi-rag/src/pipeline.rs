//! `DiagnosticAssistant`: the assembled interpretation pipeline.
//!
//! ```text
//! ParsedLog ──build──▶ Documents ──index──▶ RetrievalIndex (per conversation)
//!                                                 │ query
//! question ──────────────────────────────────────▶ PromptComposer
//!                                                 │ prompt
//!                                 TieredGenerator (ollama → bedrock → rules)
//!                                                 │ text
//!                                        SeverityClassifier ──▶ Answer
//! ```

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use oi_protocol::{Answer, ConversationContext, DocumentSource, FaultCode, Metric, ParsedLog, Severity};
use oi_telemetry::{FaultCodeKb, MetricCatalog};

use crate::documents::DocumentBuilder;
use crate::embedding::{Embedder, HashingEmbedder};
use crate::error::PipelineResult;
use crate::generation::{Generation, Generator, RULES_TIER, RuleBasedGenerator, TieredGenerator};
use crate::index::RetrievalIndex;
use crate::prompt::{DEFAULT_HISTORY_TURNS, Intent, PromptComposer, SUMMARY_QUESTION};
use crate::severity::SeverityClassifier;

/// Tunables for the assistant.
#[derive(Debug, Clone, PartialEq)]
pub struct AssistantSettings {
    /// Documents retrieved per question.
    pub top_k: usize,
    /// Earlier turns restated in each prompt.
    pub history_turns: usize,
    /// Cap on each generation tier.
    pub generation_timeout: Duration,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            top_k: 5,
            history_turns: DEFAULT_HISTORY_TURNS,
            generation_timeout: Duration::from_secs(30),
        }
    }
}

pub struct DiagnosticAssistant {
    builder: DocumentBuilder,
    index: RetrievalIndex,
    composer: PromptComposer,
    classifier: SeverityClassifier,
    generator: TieredGenerator,
    catalog: Arc<MetricCatalog>,
    kb: Arc<FaultCodeKb>,
    settings: AssistantSettings,
}

impl DiagnosticAssistant {
    /// Assistant over `backends`, tried in order before the rule-based tier.
    /// An empty `backends` list answers every question from rules.
    pub fn new(
        catalog: Arc<MetricCatalog>,
        kb: Arc<FaultCodeKb>,
        backends: Vec<Arc<dyn Generator>>,
        settings: AssistantSettings,
    ) -> Self {
        Self::with_embedder(catalog, kb, backends, settings, Arc::new(HashingEmbedder::default()))
    }

    pub fn with_embedder(
        catalog: Arc<MetricCatalog>,
        kb: Arc<FaultCodeKb>,
        backends: Vec<Arc<dyn Generator>>,
        settings: AssistantSettings,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            builder: DocumentBuilder::new(),
            index: RetrievalIndex::new(embedder),
            composer: PromptComposer::new(catalog.clone()).with_history_turns(settings.history_turns),
            classifier: SeverityClassifier::new(),
            generator: TieredGenerator::new(backends, settings.generation_timeout),
            catalog,
            kb,
            settings,
        }
    }

    pub fn settings(&self) -> &AssistantSettings {
        &self.settings
    }

    pub fn index(&self) -> &RetrievalIndex {
        &self.index
    }

    pub fn classifier(&self) -> &SeverityClassifier {
        &self.classifier
    }

    pub fn composer(&self) -> &PromptComposer {
        &self.composer
    }

    pub fn catalog(&self) -> &Arc<MetricCatalog> {
        &self.catalog
    }

    pub fn knowledge_base(&self) -> &Arc<FaultCodeKb> {
        &self.kb
    }

    /// Build documents for `log` and (re)index them for the conversation.
    /// Returns the number of documents indexed.
    pub async fn ingest(&self, conversation_id: Uuid, log: &ParsedLog) -> usize {
        let documents = self.builder.build(log);
        let count = documents.len();
        self.index.index(conversation_id, documents).await;
        count
    }

    /// Answer one question about the conversation's log.
    ///
    /// Fails only with `IndexNotFound` when the conversation was never
    /// ingested. Backend failures fall through to the rule-based tier.
    pub async fn ask(
        &self,
        conversation_id: Uuid,
        query: &str,
        context: &ConversationContext,
    ) -> PipelineResult<Answer> {
        let retrieved = self
            .index
            .query(conversation_id, query, self.settings.top_k)
            .await?;
        let prompt = self.composer.compose(query, &retrieved, context);
        let intent = self.composer.select(query);

        let generation = self.generate(&prompt, intent, query, context.log.as_ref()).await;
        let (metrics, fault_codes) = match &context.log {
            Some(log) => (log.metrics.as_slice(), log.fault_codes.as_slice()),
            None => (Default::default(), Default::default()),
        };
        let severity = self.grade(&generation, metrics, fault_codes);

        tracing::info!(
            conversation_id = %conversation_id,
            intent = intent.as_str(),
            tier = %generation.tier,
            severity = %severity,
            sources = retrieved.len(),
            "question answered"
        );

        Ok(Answer {
            text: generation.text,
            severity,
            sources: retrieved.into_iter().map(|d| d.source).collect(),
            generated_by: generation.tier,
        })
    }

    /// Overall health summary of the conversation's log.
    ///
    /// Works without an index; severity comes from the log alone.
    pub async fn summarize(&self, context: &ConversationContext) -> Answer {
        let prompt = self.composer.compose_summary(context);
        let generation = self
            .generate(&prompt, Intent::General, SUMMARY_QUESTION, context.log.as_ref())
            .await;

        let (severity, sources) = match &context.log {
            Some(log) => (log.overall_severity(), self.sources_for(log)),
            None => (Severity::Normal, Vec::new()),
        };

        tracing::info!(tier = %generation.tier, severity = %severity, "summary generated");
        Answer {
            text: generation.text,
            severity,
            sources,
            generated_by: generation.tier,
        }
    }

    /// Explain one fault code, whether or not it appears in the log.
    ///
    /// Severity is the code's own: the log's entry when present, otherwise
    /// the knowledge base entry, otherwise the unknown-code policy.
    pub async fn explain_fault_code(&self, code: &str, context: &ConversationContext) -> Answer {
        let code = code.trim().to_uppercase();
        let logged = context
            .log
            .as_ref()
            .and_then(|log| log.fault_codes.iter().find(|f| f.code == code).cloned());
        let fault = logged.unwrap_or_else(|| self.kb.resolve(&code));

        let query = format!("Explain the fault code {code}.");
        let documents = context
            .log
            .as_ref()
            .map(|log| {
                self.builder
                    .build(log)
                    .into_iter()
                    .filter(|d| d.source.id == code)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        let prompt = self.composer.compose(&query, &documents, context);
        let generation = self
            .generate(&prompt, Intent::FaultCode, &query, context.log.as_ref())
            .await;
        let severity = fault.severity;

        tracing::info!(code = %code, tier = %generation.tier, severity = %severity, "fault code explained");
        Answer {
            text: generation.text,
            severity,
            sources: documents.into_iter().map(|d| d.source).collect(),
            generated_by: generation.tier,
        }
    }

    /// Drop the conversation's index. Returns false if there was none.
    pub async fn forget(&self, conversation_id: Uuid) -> bool {
        self.index.remove(conversation_id).await
    }

    async fn generate(
        &self,
        prompt: &str,
        intent: Intent,
        query: &str,
        log: Option<&ParsedLog>,
    ) -> Generation {
        let rules = RuleBasedGenerator::new(
            self.catalog.clone(),
            self.kb.clone(),
            intent,
            query,
            log.cloned(),
        );
        match self.generator.run_with_fallback(prompt, &rules).await {
            Ok(generation) => generation,
            Err(e) => {
                tracing::warn!(error = %e, "generation chain failed, using rules directly");
                Generation {
                    text: rules.answer(),
                    tier: RULES_TIER.to_string(),
                }
            }
        }
    }

    /// Rule-based text restates the data, so only the data is scored.
    fn grade(&self, generation: &Generation, metrics: &[Metric], fault_codes: &[FaultCode]) -> Severity {
        let text = if generation.tier == RULES_TIER {
            ""
        } else {
            generation.text.as_str()
        };
        self.classifier.classify(text, metrics, fault_codes)
    }

    fn sources_for(&self, log: &ParsedLog) -> Vec<DocumentSource> {
        self.builder.build(log).into_iter().map(|d| d.source).collect()
    }
}
