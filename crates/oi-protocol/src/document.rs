use serde::{Deserialize, Serialize};

use crate::severity::Severity;
use crate::telemetry::ParsedLog;

/// What a retrievable snippet was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Metric,
    FaultCode,
}

/// Provenance of a document: the metric name or fault code it describes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentSource {
    pub kind: DocumentKind,
    /// Canonical metric name or DTC string.
    pub id: String,
}

/// A short retrievable text snippet derived from a parsed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub text: String,
    pub source: DocumentSource,
}

/// A severity-tagged answer to one user question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub severity: Severity,
    /// Sources of the documents that grounded the answer, in retrieval order.
    pub sources: Vec<DocumentSource>,
    /// Name of the generation tier that produced `text`.
    pub generated_by: String,
}

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One earlier message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// State the chat collaborator hands in with every question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConversationContext {
    /// The log currently attached to the conversation, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log: Option<ParsedLog>,
    /// Earlier turns, oldest first.
    #[serde(default)]
    pub history: Vec<Turn>,
}

impl ConversationContext {
    pub fn with_log(log: ParsedLog) -> Self {
        Self {
            log: Some(log),
            history: Vec::new(),
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.history.push(turn);
    }
}
