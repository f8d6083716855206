//! Document builder: one retrievable snippet per metric and per fault code.

use oi_protocol::{Document, DocumentKind, DocumentSource, FaultCode, Metric, ParsedLog};

/// Converts a parsed log into retrievable documents.
///
/// The mapping is pure: the same `ParsedLog` always yields the same
/// documents in the same order (metrics first, then fault codes).
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentBuilder;

impl DocumentBuilder {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, log: &ParsedLog) -> Vec<Document> {
        log.metrics
            .iter()
            .map(metric_document)
            .chain(log.fault_codes.iter().map(fault_code_document))
            .collect()
    }
}

fn metric_document(metric: &Metric) -> Document {
    Document {
        text: format!(
            "{} is {}{}, status {}",
            metric.name,
            metric.display_value(),
            metric.unit,
            metric.status
        ),
        source: DocumentSource {
            kind: DocumentKind::Metric,
            id: metric.name.clone(),
        },
    }
}

fn fault_code_document(fault: &FaultCode) -> Document {
    Document {
        text: format!(
            "{}: {}, severity {}",
            fault.code, fault.description, fault.severity
        ),
        source: DocumentSource {
            kind: DocumentKind::FaultCode,
            id: fault.code.clone(),
        },
    }
}
