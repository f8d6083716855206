use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dtc::FaultCode;
use crate::severity::Severity;

/// A single named vehicle metric at its representative (latest) reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    /// Canonical metric name (e.g., "engine_rpm", "coolant_temp").
    pub name: String,
    /// Representative value taken from the latest row carrying this metric.
    pub value: f64,
    /// Unit of measurement (e.g., "RPM", "°C").
    pub unit: String,
    /// Band derived from the metric's threshold table.
    pub status: Severity,
    /// Timestamp of the row the value came from, when the log carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Metric {
    /// Value rendered with at most two decimals and no trailing zeros.
    pub fn display_value(&self) -> String {
        format_value(self.value)
    }
}

/// Summary statistics for one metric across every row of a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricStatistics {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Sample standard deviation; zero for a single sample.
    pub std: f64,
    pub samples: usize,
}

impl MetricStatistics {
    /// Compute statistics over a slice of samples. Returns `None` when empty.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = samples.iter().sum::<f64>() / n;
        let variance = if samples.len() > 1 {
            samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
        } else {
            0.0
        };
        Some(Self {
            min,
            max,
            mean,
            std: variance.sqrt(),
            samples: samples.len(),
        })
    }
}

/// Everything extracted from one uploaded diagnostic log.
///
/// Built once per upload and never mutated afterwards; a new upload
/// produces a new `ParsedLog`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedLog {
    /// Metrics in catalog order.
    pub metrics: Vec<Metric>,
    /// Deduplicated fault codes, sorted by code.
    pub fault_codes: Vec<FaultCode>,
    /// Number of data rows in the source file (header excluded).
    pub raw_row_count: usize,
    /// Per-metric statistics keyed by canonical metric name.
    #[serde(default)]
    pub statistics: BTreeMap<String, MetricStatistics>,
}

impl ParsedLog {
    /// Find a metric by canonical name.
    pub fn metric(&self, name: &str) -> Option<&Metric> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Count of metrics plus fault codes in the critical band.
    pub fn critical_count(&self) -> usize {
        self.count_at(Severity::Critical)
    }

    /// Count of metrics plus fault codes in the warning band.
    pub fn warning_count(&self) -> usize {
        self.count_at(Severity::Warning)
    }

    /// True when any metric is out of band or any fault code is logged,
    /// whatever the code's severity.
    pub fn has_issues(&self) -> bool {
        self.critical_count() > 0 || self.warning_count() > 0 || !self.fault_codes.is_empty()
    }

    /// Highest severity across every metric status and fault code.
    pub fn overall_severity(&self) -> Severity {
        Severity::max_of(
            self.metrics
                .iter()
                .map(|m| m.status)
                .chain(self.fault_codes.iter().map(|f| f.severity)),
        )
    }

    fn count_at(&self, level: Severity) -> usize {
        self.metrics.iter().filter(|m| m.status == level).count()
            + self.fault_codes.iter().filter(|f| f.severity == level).count()
    }
}

/// Render a float compactly: integers without decimals, others to two places.
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
