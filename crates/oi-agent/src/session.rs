//! In-memory diagnostic session: one conversation, one log at a time.
//!
//! Mirrors what the chat collaborator does around the pipeline: validate
//! and parse an upload, index it, keep the running turn history, and ask.

use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

use oi_protocol::{Answer, ConversationContext, ParsedLog, Severity, Turn};
use oi_rag::DiagnosticAssistant;
use oi_telemetry::{LogSource, TelemetryError, TelemetryParser};

/// What an accepted upload contained.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReport {
    pub path: String,
    pub rows: usize,
    pub metrics: usize,
    pub fault_codes: usize,
    pub documents: usize,
    pub severity: Severity,
}

pub struct DiagnosticSession {
    conversation_id: Uuid,
    parser: TelemetryParser,
    assistant: Arc<DiagnosticAssistant>,
    context: ConversationContext,
}

impl DiagnosticSession {
    pub fn new(parser: TelemetryParser, assistant: Arc<DiagnosticAssistant>) -> Self {
        Self {
            conversation_id: Uuid::now_v7(),
            parser,
            assistant,
            context: ConversationContext::default(),
        }
    }

    pub fn conversation_id(&self) -> Uuid {
        self.conversation_id
    }

    pub fn context(&self) -> &ConversationContext {
        &self.context
    }

    pub fn log(&self) -> Option<&ParsedLog> {
        self.context.log.as_ref()
    }

    /// Validate, parse and index a log. Replaces any earlier upload;
    /// the turn history is kept.
    pub async fn upload(&mut self, path: &str, source: &dyn LogSource) -> anyhow::Result<UploadReport> {
        let validation = self.parser.validate(path, source).await;
        if !validation.valid {
            tracing::warn!(path = %path, reason = %validation.message, "upload rejected");
            return Err(TelemetryError::Validation(validation.message).into());
        }

        let log = self.parser.parse(path, source).await?;
        let documents = self.assistant.ingest(self.conversation_id, &log).await;
        let report = UploadReport {
            path: path.to_string(),
            rows: log.raw_row_count,
            metrics: log.metrics.len(),
            fault_codes: log.fault_codes.len(),
            documents,
            severity: log.overall_severity(),
        };
        self.context.log = Some(log);

        tracing::info!(
            conversation_id = %self.conversation_id,
            metrics = report.metrics,
            fault_codes = report.fault_codes,
            "log uploaded"
        );
        Ok(report)
    }

    /// Ask a question and record both turns.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<Answer> {
        let answer = self
            .assistant
            .ask(self.conversation_id, question, &self.context)
            .await?;
        self.record(question, &answer);
        Ok(answer)
    }

    pub async fn summary(&mut self) -> Answer {
        let answer = self.assistant.summarize(&self.context).await;
        self.record(oi_rag::prompt::SUMMARY_QUESTION, &answer);
        answer
    }

    pub async fn explain(&mut self, code: &str) -> Answer {
        let answer = self.assistant.explain_fault_code(code, &self.context).await;
        self.record(&format!("Explain {code}"), &answer);
        answer
    }

    /// Drop the conversation's index and history.
    pub async fn close(mut self) -> bool {
        self.context = ConversationContext::default();
        self.assistant.forget(self.conversation_id).await
    }

    fn record(&mut self, question: &str, answer: &Answer) {
        self.context.push(Turn::user(question));
        self.context.push(Turn::assistant(answer.text.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oi_rag::AssistantSettings;
    use oi_telemetry::mock::{FAULTY_SAMPLE_PATH, HEALTHY_SAMPLE_PATH};
    use oi_telemetry::{FaultCodeKb, MetricCatalog, MockLogSource};

    fn session() -> DiagnosticSession {
        let catalog = Arc::new(MetricCatalog::standard());
        let kb = Arc::new(FaultCodeKb::standard());
        let assistant = DiagnosticAssistant::new(
            catalog.clone(),
            kb.clone(),
            vec![],
            AssistantSettings::default(),
        );
        DiagnosticSession::new(TelemetryParser::new(catalog, kb), Arc::new(assistant))
    }

    #[tokio::test]
    async fn upload_then_ask_records_history() {
        let source = MockLogSource::with_healthy_sample();
        let mut s = session();
        let report = s.upload(HEALTHY_SAMPLE_PATH, &source).await.unwrap();
        assert_eq!(report.rows, 3);
        assert_eq!(report.metrics, 7);
        assert_eq!(report.fault_codes, 0);
        assert_eq!(report.documents, 7);
        assert_eq!(report.severity, Severity::Normal);

        let answer = s.ask("How is my battery?").await.unwrap();
        assert_eq!(answer.generated_by, "rules");
        assert_eq!(s.context().history.len(), 2);
    }

    #[tokio::test]
    async fn rejected_upload_is_validation_error() {
        let mut source = MockLogSource::new();
        source.add_file("/uploads/notes.txt", "rpm\n800\n");
        let mut s = session();
        let err = s.upload("/uploads/notes.txt", &source).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TelemetryError>(),
            Some(TelemetryError::Validation(_))
        ));
        assert!(s.log().is_none());
    }

    #[tokio::test]
    async fn ask_before_upload_fails() {
        let mut s = session();
        assert!(s.ask("hello").await.is_err());
        assert!(s.context().history.is_empty());
    }

    #[tokio::test]
    async fn faulty_upload_is_critical() {
        let source = MockLogSource::with_faulty_sample();
        let mut s = session();
        let report = s.upload(FAULTY_SAMPLE_PATH, &source).await.unwrap();
        assert_eq!(report.severity, Severity::Critical);
        assert_eq!(report.fault_codes, 3);

        let answer = s.explain("P1234").await;
        assert_eq!(answer.severity, Severity::Warning);
        assert!(s.close().await);
    }
}
