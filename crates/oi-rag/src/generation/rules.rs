//! Rule-based answer tier.
//!
//! Last link of the generation chain. Builds a plain-language answer
//! directly from the parsed log and the knowledge base, so it never
//! depends on a model being reachable and never fails.

use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;

use oi_protocol::{FaultCode, Metric, ParsedLog, Severity};
use oi_telemetry::{FaultCodeKb, MetricCatalog};

use super::Generator;
use crate::error::GenerationResult;
use crate::prompt::{Intent, codes_in};

pub const RULES_TIER: &str = "rules";

const PREAMBLE: &str = "Detailed AI analysis is unavailable right now, so this answer is \
built directly from your diagnostic data.";

const NO_LOG: &str = "No diagnostic log has been uploaded in this conversation yet. Upload an \
OBD-II log (.csv or .tsv) and I can explain your vehicle's readings and fault codes.";

/// Deterministic answer for one question.
///
/// Constructed per question, since the answer depends on the question's
/// intent and the log in the conversation. The prompt passed to
/// [`Generator::generate`] is ignored.
pub struct RuleBasedGenerator {
    catalog: Arc<MetricCatalog>,
    kb: Arc<FaultCodeKb>,
    intent: Intent,
    query: String,
    log: Option<ParsedLog>,
}

impl RuleBasedGenerator {
    pub fn new(
        catalog: Arc<MetricCatalog>,
        kb: Arc<FaultCodeKb>,
        intent: Intent,
        query: impl Into<String>,
        log: Option<ParsedLog>,
    ) -> Self {
        Self {
            catalog,
            kb,
            intent,
            query: query.into(),
            log,
        }
    }

    /// The rendered answer. Always non-empty.
    pub fn answer(&self) -> String {
        let mut out = String::from(PREAMBLE);
        out.push_str("\n\n");

        match self.intent {
            Intent::FaultCode => self.explain_codes(&mut out),
            Intent::Metric => self.explain_metric(&mut out),
            Intent::General => self.summarize(&mut out),
        }
        out.trim_end().to_string()
    }

    fn explain_codes(&self, out: &mut String) {
        let named = codes_in(&self.query);
        let logged = self.log.as_ref().map(|l| l.fault_codes.as_slice()).unwrap_or_default();

        if named.is_empty() {
            match &self.log {
                None => out.push_str(NO_LOG),
                Some(_) if logged.is_empty() => out.push_str(
                    "No fault codes were found in your log. That is good news, although it \
                     does not guarantee every system is perfect: major problems would normally \
                     set a code and turn on the check engine light.",
                ),
                Some(_) => {
                    let _ = writeln!(out, "Your log contains {} fault code(s):", logged.len());
                    for fault in logged {
                        describe_code(out, fault);
                    }
                }
            }
            return;
        }

        for code in named {
            let in_log = logged.iter().find(|f| f.code == code);
            let fault = in_log.cloned().unwrap_or_else(|| {
                self.kb.lookup(&code).unwrap_or_else(|| FaultCode::unknown(&code))
            });
            describe_code(out, &fault);
            match (&self.log, in_log) {
                (Some(_), None) => {
                    let _ = writeln!(out, "  {code} does not appear in your uploaded log.");
                }
                (None, _) => {}
                (Some(_), Some(_)) => {
                    let _ = writeln!(out, "  {code} is present in your uploaded log.");
                }
            }
        }
    }

    fn explain_metric(&self, out: &mut String) {
        let Some(def) = self.catalog.mentioned_in(&self.query) else {
            self.summarize(out);
            return;
        };
        let Some(log) = &self.log else {
            let _ = writeln!(
                out,
                "{} is measured in {}. Its normal range is {}.",
                def.description,
                def.unit,
                def.normal_range()
            );
            out.push_str(NO_LOG);
            return;
        };
        let Some(metric) = log.metric(&def.name) else {
            let _ = write!(
                out,
                "Your uploaded log has no {} readings, so I cannot tell you how it is doing. \
                 Its normal range is {}.",
                def.description.to_lowercase(),
                def.normal_range()
            );
            return;
        };

        let _ = writeln!(
            out,
            "{}: {} {} (status {}). Normal range: {}.",
            def.description,
            metric.display_value(),
            metric.unit,
            metric.status,
            def.normal_range()
        );
        if let Some(stats) = log.statistics.get(&def.name)
            && stats.samples > 1
        {
            let _ = writeln!(
                out,
                "Across {} readings it ranged from {} to {} {}, averaging {}.",
                stats.samples,
                oi_protocol::format_value(stats.min),
                oi_protocol::format_value(stats.max),
                metric.unit,
                oi_protocol::format_value(stats.mean)
            );
        }
        out.push_str(metric.status.recommendation());
    }

    fn summarize(&self, out: &mut String) {
        let Some(log) = &self.log else {
            out.push_str(NO_LOG);
            return;
        };

        let overall = log.overall_severity();
        let _ = writeln!(
            out,
            "Overall status: {} ({} rows analyzed, {} critical and {} warning findings).",
            overall.as_str().to_uppercase(),
            log.raw_row_count,
            log.critical_count(),
            log.warning_count()
        );

        let flagged: Vec<&Metric> = [Severity::Critical, Severity::Warning]
            .iter()
            .flat_map(|s| log.metrics.iter().filter(move |m| m.status == *s))
            .collect();
        if flagged.is_empty() {
            out.push_str("All recorded readings are within their normal ranges.\n");
        } else {
            out.push_str("Readings outside their normal range:\n");
            for m in flagged {
                let range = self
                    .catalog
                    .get(&m.name)
                    .map(|d| format!(", normal {}", d.normal_range()))
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "- {}: {} {} ({}{range})",
                    m.name,
                    m.display_value(),
                    m.unit,
                    m.status
                );
            }
        }

        if log.fault_codes.is_empty() {
            out.push_str("No fault codes were found.\n");
        } else {
            out.push_str("Fault codes:\n");
            for fault in &log.fault_codes {
                let _ = writeln!(out, "- {}: {} ({})", fault.code, fault.description, fault.severity);
            }
        }

        out.push('\n');
        out.push_str(overall.recommendation());
    }
}

fn describe_code(out: &mut String, fault: &FaultCode) {
    let _ = writeln!(
        out,
        "- {}: {} (severity {}, {} system).",
        fault.code,
        fault.description,
        fault.severity,
        fault.category.as_str()
    );
    if !fault.possible_causes.is_empty() {
        let _ = writeln!(out, "  Common causes: {}.", fault.possible_causes.join(", "));
    }
    if !fault.is_generic {
        let _ = writeln!(
            out,
            "  This is a manufacturer-specific code; a dealer or specialist should confirm it."
        );
    }
    let _ = writeln!(out, "  {}", fault.recommended_action());
}

#[async_trait]
impl Generator for RuleBasedGenerator {
    async fn generate(&self, _prompt: &str) -> GenerationResult<String> {
        Ok(self.answer())
    }

    fn tier_name(&self) -> &str {
        RULES_TIER
    }
}
