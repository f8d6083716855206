//! Severity classifier: fold fault codes, metric statuses and answer text
//! into one band.
//!
//! Evaluation order is fixed and short-circuits on the first critical
//! signal: critical fault code, critical metric, critical wording, then the
//! same three sources at warning level, then normal. The classifier never
//! fails and never reports critical without a critical input.

use oi_protocol::{FaultCode, Metric, Severity};

const CRITICAL_KEYWORDS: &[&str] = &[
    "immediate",
    "immediately",
    "stop driving",
    "dangerous",
    "danger",
    "critical",
    "severe",
    "emergency",
    "safety risk",
    "do not drive",
    "tow",
    "pull over",
    "serious damage",
    "engine damage",
    "unsafe",
    "fire",
    "overheat",
    "overheating",
    "failure imminent",
];

const WARNING_KEYWORDS: &[&str] = &[
    "attention",
    "soon",
    "monitor",
    "abnormal",
    "unusual",
    "inspect",
    "inspection",
    "schedule",
    "elevated",
    "concern",
    "concerning",
    "issue",
    "issues",
    "problem",
    "problems",
    "may cause",
    "could lead",
    "outside the normal range",
    "not normal",
    "worn",
    "failing",
];

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "none", "nothing", "without", "isn't", "aren't", "wasn't",
    "weren't", "don't", "doesn't", "didn't", "won't", "wouldn't", "can't", "cannot",
    "couldn't", "shouldn't", "nor",
];

/// Words before a keyword that are checked for a negation.
const NEGATION_WINDOW: usize = 2;

/// Keyword-and-data severity classifier.
///
/// Negation handling is an adjacency heuristic: an occurrence is ignored
/// when one of the two words right before it is a negation ("not
/// dangerous", "no immediate risk"). It does not model negation scope.
#[derive(Debug, Clone)]
pub struct SeverityClassifier {
    critical: Vec<Vec<String>>,
    warning: Vec<Vec<String>>,
    negations: Vec<String>,
}

impl SeverityClassifier {
    pub fn new() -> Self {
        Self::with_keywords(CRITICAL_KEYWORDS, WARNING_KEYWORDS)
    }

    /// Classifier with custom keyword lists (phrases allowed).
    pub fn with_keywords(critical: &[&str], warning: &[&str]) -> Self {
        Self {
            critical: phrases(critical),
            warning: phrases(warning),
            negations: NEGATIONS.iter().map(|n| n.to_string()).collect(),
        }
    }

    /// Severity of an answer given the data it was generated from.
    pub fn classify(&self, answer_text: &str, metrics: &[Metric], fault_codes: &[FaultCode]) -> Severity {
        let text = words(answer_text);

        if fault_codes.iter().any(|f| f.severity == Severity::Critical) {
            return Severity::Critical;
        }
        if metrics.iter().any(|m| m.status == Severity::Critical) {
            return Severity::Critical;
        }
        if self.mentions(&text, &self.critical) {
            return Severity::Critical;
        }

        if fault_codes.iter().any(|f| f.severity == Severity::Warning)
            || metrics.iter().any(|m| m.status == Severity::Warning)
            || self.mentions(&text, &self.warning)
        {
            return Severity::Warning;
        }

        Severity::Normal
    }

    /// Severity of a piece of text alone, e.g. a stored chat message.
    pub fn classify_text(&self, text: &str) -> Severity {
        self.classify(text, &[], &[])
    }

    /// Whether any keyword phrase occurs in `text` without a negation in
    /// the words just before it. Every occurrence is checked.
    fn mentions(&self, text: &[String], keywords: &[Vec<String>]) -> bool {
        keywords.iter().any(|phrase| {
            text.windows(phrase.len())
                .enumerate()
                .any(|(start, window)| window == phrase.as_slice() && !self.negated(text, start))
        })
    }

    fn negated(&self, text: &[String], start: usize) -> bool {
        let from = start.saturating_sub(NEGATION_WINDOW);
        text[from..start].iter().any(|w| self.negations.contains(w))
    }
}

impl Default for SeverityClassifier {
    fn default() -> Self {
        Self::new()
    }
}

fn phrases(list: &[&str]) -> Vec<Vec<String>> {
    list.iter().map(|k| words(k)).filter(|p| !p.is_empty()).collect()
}

/// Lowercased words; apostrophes stay inside words so "isn't" survives.
fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .replace('\u{2019}', "'")
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|w| w.trim_matches('\''))
        .filter(|w| !w.is_empty())
        .map(String::from)
        .collect()
}
