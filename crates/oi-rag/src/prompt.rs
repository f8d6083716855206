//! Prompt composer: pick a template by query intent and assemble the
//! grounding context, conversation state and question into one prompt.
//!
//! Template selection is a flat, ordered rule list. The first rule whose
//! predicate matches wins; when none match, the general template is used.

use std::fmt::Write;
use std::sync::{Arc, LazyLock};

use regex::Regex;

use oi_protocol::{ConversationContext, Document, FaultCode, ParsedLog, Severity};
use oi_telemetry::MetricCatalog;

/// A code-shaped token anywhere in the question.
static CODE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b[PCBU][0-9]{4}\b").unwrap());

/// The question talks about codes without naming one.
static CODE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:codes?|dtcs?)\b").unwrap());

pub const DEFAULT_HISTORY_TURNS: usize = 6;

/// Question used when the caller asks for an overall health summary.
pub const SUMMARY_QUESTION: &str = "Give me a complete health summary of my vehicle.";

const PERSONA: &str = "You are OBD InsightBot, a friendly automotive diagnostic assistant. \
You help vehicle owners who are not mechanics understand the OBD-II diagnostic log they uploaded.";

const FAULT_CODE_GUIDE: &str = "\
The owner is asking about diagnostic trouble codes. For each relevant code:
1. Say what the code means in everyday words.
2. List the most common causes, most likely first.
3. Describe symptoms the driver may notice.
4. Say whether it is safe to keep driving.
5. Suggest the next step.";

const METRIC_GUIDE: &str = "\
The owner is asking about a specific sensor reading. Explain:
1. What the sensor measures and why it matters.
2. Whether the current reading is a concern, compared with its normal range.
3. What typically causes readings like this.
4. What the owner should do, if anything.";

const GENERAL_GUIDE: &str = "\
Give the owner a clear picture of the vehicle's condition:
1. Start with the overall status: healthy, needs attention, or critical.
2. Cover critical findings first, then warnings, then what looks fine.
3. Finish with practical recommendations.";

const INSTRUCTIONS: &str = "\
INSTRUCTIONS:
- Use plain, non-technical language and explain any technical term you must use.
- Base your answer only on the diagnostic data above.
- If the question is about something this data does not cover, say clearly that the data is not available in the uploaded log, then suggest how the owner could find out (for example a visual check or a mechanic visit).
- Be honest about how urgent any issue is, and recommend a professional inspection for serious problems.";

/// Which template a question is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    FaultCode,
    Metric,
    General,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FaultCode => "fault_code",
            Self::Metric => "metric",
            Self::General => "general",
        }
    }

    fn guide(&self) -> &'static str {
        match self {
            Self::FaultCode => FAULT_CODE_GUIDE,
            Self::Metric => METRIC_GUIDE,
            Self::General => GENERAL_GUIDE,
        }
    }
}

type Predicate = fn(&PromptComposer, &str) -> bool;

/// One (predicate, template) pair of the selection list.
struct TemplateRule {
    intent: Intent,
    matches: Predicate,
}

fn names_fault_code(_: &PromptComposer, query: &str) -> bool {
    CODE_TOKEN.is_match(query) || CODE_WORD.is_match(query)
}

fn names_metric(composer: &PromptComposer, query: &str) -> bool {
    composer.catalog.mentioned_in(query).is_some()
}

/// Builds generation prompts. Pure string assembly, no side effects.
pub struct PromptComposer {
    catalog: Arc<MetricCatalog>,
    rules: Vec<TemplateRule>,
    history_turns: usize,
}

impl PromptComposer {
    pub fn new(catalog: Arc<MetricCatalog>) -> Self {
        Self {
            catalog,
            rules: vec![
                TemplateRule {
                    intent: Intent::FaultCode,
                    matches: names_fault_code,
                },
                TemplateRule {
                    intent: Intent::Metric,
                    matches: names_metric,
                },
            ],
            history_turns: DEFAULT_HISTORY_TURNS,
        }
    }

    /// How many earlier turns to restate in each prompt.
    pub fn with_history_turns(mut self, turns: usize) -> Self {
        self.history_turns = turns;
        self
    }

    /// Template for `query`: first matching rule, else general.
    pub fn select(&self, query: &str) -> Intent {
        self.rules
            .iter()
            .find(|rule| (rule.matches)(self, query))
            .map(|rule| rule.intent)
            .unwrap_or(Intent::General)
    }

    /// Assemble the full prompt for one question.
    pub fn compose(
        &self,
        query: &str,
        retrieved: &[Document],
        context: &ConversationContext,
    ) -> String {
        let intent = self.select(query);
        tracing::debug!(intent = intent.as_str(), "prompt template selected");
        self.render(intent, query, Some(retrieved), context)
    }

    /// Prompt for an overall health summary. Uses the general template and
    /// the full log instead of retrieved snippets.
    pub fn compose_summary(&self, context: &ConversationContext) -> String {
        self.render(Intent::General, SUMMARY_QUESTION, None, context)
    }

    fn render(
        &self,
        intent: Intent,
        query: &str,
        retrieved: Option<&[Document]>,
        context: &ConversationContext,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{PERSONA}\n\n{}\n\nCONTEXT:", intent.guide());

        if let Some(docs) = retrieved {
            if docs.is_empty() {
                out.push_str("Relevant findings: none matched this question.\n");
            } else {
                out.push_str("Relevant findings from the uploaded log:\n");
                for doc in docs {
                    let _ = writeln!(out, "- {}", doc.text);
                }
            }
            out.push('\n');
        }

        match &context.log {
            Some(log) => restate_log(&mut out, log),
            None => out.push_str("No diagnostic log has been uploaded in this conversation.\n"),
        }

        let notes = match intent {
            Intent::FaultCode => self.fault_code_notes(query, context.log.as_ref()),
            Intent::Metric => self.metric_notes(query, context.log.as_ref()),
            Intent::General => general_notes(context.log.as_ref()),
        };
        if !notes.is_empty() {
            out.push('\n');
            for note in notes {
                let _ = writeln!(out, "{note}");
            }
        }

        self.restate_history(&mut out, context);

        let _ = write!(out, "\n{INSTRUCTIONS}\n\nUSER QUESTION:\n{query}\n\nRESPONSE:\n");
        out
    }

    fn fault_code_notes(&self, query: &str, log: Option<&ParsedLog>) -> Vec<String> {
        let mut notes = Vec::new();
        let log_codes = log.map(|l| l.fault_codes.as_slice()).unwrap_or_default();

        if log.is_some() && log_codes.is_empty() {
            notes.push(
                "The uploaded log contains no fault codes. Explain that this is good news, \
                 that it does not guarantee every system is perfect, and what kinds of \
                 problems would set a code."
                    .to_string(),
            );
        }

        for code in codes_in(query) {
            match log_codes.iter().find(|f| f.code == code) {
                Some(fault) => notes.push(describe_logged_code(fault)),
                None => notes.push(format!("Code {code} does not appear in the uploaded log.")),
            }
            if !FaultCode::is_generic_code(&code) {
                notes.push(format!(
                    "{code} is a manufacturer-specific code: its exact meaning depends on the \
                     vehicle maker, generic scan tools may not fully describe it, and a dealer \
                     or specialist should confirm the diagnosis."
                ));
            }
        }
        notes
    }

    fn metric_notes(&self, query: &str, log: Option<&ParsedLog>) -> Vec<String> {
        let Some(def) = self.catalog.mentioned_in(query) else {
            return Vec::new();
        };
        let mut notes = vec![format!(
            "Focus metric: {} ({}). Normal range: {}.",
            def.name,
            def.description,
            def.normal_range()
        )];
        match log.and_then(|l| l.metric(&def.name)) {
            Some(m) => notes.push(format!(
                "Current reading: {} {}, status {}.",
                m.display_value(),
                m.unit,
                m.status
            )),
            None => notes.push(format!(
                "The uploaded log has no {} readings.",
                def.name
            )),
        }
        notes
    }

    fn restate_history(&self, out: &mut String, context: &ConversationContext) {
        if self.history_turns == 0 || context.history.is_empty() {
            return;
        }
        let start = context.history.len().saturating_sub(self.history_turns);
        out.push_str("\nRecent conversation:\n");
        for turn in &context.history[start..] {
            let _ = writeln!(out, "{}: {}", turn.role.as_str(), turn.content.trim());
        }
    }
}

fn restate_log(out: &mut String, log: &ParsedLog) {
    let _ = writeln!(out, "Current vehicle data ({} rows analyzed):", log.raw_row_count);
    if log.metrics.is_empty() {
        out.push_str("Metrics: none recorded\n");
    } else {
        out.push_str("Metrics:\n");
        for m in &log.metrics {
            let _ = writeln!(out, "- {}: {} {} ({})", m.name, m.display_value(), m.unit, m.status);
        }
    }
    if log.fault_codes.is_empty() {
        out.push_str("Fault codes: none detected\n");
    } else {
        out.push_str("Fault codes:\n");
        for f in &log.fault_codes {
            let _ = writeln!(out, "- {}: {} ({})", f.code, f.description, f.severity);
        }
    }
}

fn describe_logged_code(fault: &FaultCode) -> String {
    let mut note = format!(
        "Code {} appears in the uploaded log: {} (severity {}, {} system).",
        fault.code,
        fault.description,
        fault.severity,
        fault.category.as_str()
    );
    if !fault.possible_causes.is_empty() {
        let _ = write!(note, " Likely causes: {}.", fault.possible_causes.join(", "));
    }
    note
}

fn general_notes(log: Option<&ParsedLog>) -> Vec<String> {
    let Some(log) = log else {
        return Vec::new();
    };
    let status = match log.overall_severity() {
        Severity::Critical => "CRITICAL, immediate attention required",
        Severity::Warning => "WARNING, some issues need attention",
        Severity::Normal => "HEALTHY, no significant issues detected",
    };
    vec![format!(
        "Overall status: {status} ({} critical, {} warning findings).",
        log.critical_count(),
        log.warning_count()
    )]
}

/// Code-shaped tokens in `text`, uppercased, in order of first appearance.
pub fn codes_in(text: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for m in CODE_TOKEN.find_iter(text) {
        let code = m.as_str().to_uppercase();
        if !codes.contains(&code) {
            codes.push(code);
        }
    }
    codes
}
