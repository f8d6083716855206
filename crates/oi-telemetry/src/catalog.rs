//! Metric catalog: column synonyms, units and threshold tables.
//!
//! The standard catalog covers the ten OBD-II metrics a consumer scan tool
//! typically exports. Tests and alternative deployments can build their own
//! catalog and hand it to the parser instead.

use oi_protocol::Severity;

// ── Thresholds ──────────────────────────────────────────────────

/// Band boundaries for one metric.
///
/// `critical_low <= warning_low <= normal_min <= normal_max <= warning_high <= critical_high`.
/// A value inside `[normal_min, normal_max]` is normal, inside the warning
/// band on either side is warning, and anything beyond the warning band or
/// outside `[critical_low, critical_high]` is critical.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub critical_low: f64,
    pub warning_low: f64,
    pub normal_min: f64,
    pub normal_max: f64,
    pub warning_high: f64,
    pub critical_high: f64,
}

impl Thresholds {
    /// Build from the normal range, the warning band and the critical band.
    pub const fn new(normal: (f64, f64), warning: (f64, f64), critical: (f64, f64)) -> Self {
        Self {
            critical_low: critical.0,
            warning_low: warning.0,
            normal_min: normal.0,
            normal_max: normal.1,
            warning_high: warning.1,
            critical_high: critical.1,
        }
    }

    /// Normal range plus a single outer bound; the warning band runs all the
    /// way out to the critical bound.
    pub const fn banded(normal: (f64, f64), critical: (f64, f64)) -> Self {
        Self::new(normal, critical, critical)
    }

    pub fn classify(&self, value: f64) -> Severity {
        let outside = |lo: f64, hi: f64| value < lo || value > hi;
        if value.is_nan()
            || outside(self.critical_low, self.critical_high)
            || outside(self.warning_low, self.warning_high)
        {
            Severity::Critical
        } else if value < self.normal_min || value > self.normal_max {
            Severity::Warning
        } else {
            Severity::Normal
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.normal_min + self.normal_max) / 2.0
    }
}

// ── Definitions ─────────────────────────────────────────────────

/// Everything the pipeline knows about one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricDefinition {
    /// Canonical name used throughout the pipeline.
    pub name: String,
    pub unit: String,
    pub description: String,
    /// Column headers that map onto this metric (canonical name included).
    pub synonyms: Vec<String>,
    /// Extra phrases that identify this metric in a user question.
    pub keywords: Vec<String>,
    pub thresholds: Thresholds,
}

impl MetricDefinition {
    pub fn new(
        name: &str,
        unit: &str,
        description: &str,
        synonyms: &[&str],
        keywords: &[&str],
        thresholds: Thresholds,
    ) -> Self {
        let mut all = vec![name.to_string()];
        all.extend(synonyms.iter().map(|s| s.to_string()));
        Self {
            name: name.into(),
            unit: unit.into(),
            description: description.into(),
            synonyms: all,
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
            thresholds,
        }
    }

    /// Normal range rendered for prompts, e.g. "70-105 °C".
    pub fn normal_range(&self) -> String {
        format!(
            "{}-{} {}",
            oi_protocol::format_value(self.thresholds.normal_min),
            oi_protocol::format_value(self.thresholds.normal_max),
            self.unit
        )
    }

    fn phrases(&self) -> impl Iterator<Item = String> + '_ {
        self.synonyms
            .iter()
            .chain(self.keywords.iter())
            .map(|s| normalize(s))
    }
}

/// What a recognized header column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    /// Index into `MetricCatalog::definitions`.
    Metric(usize),
    FaultCodes,
    FreeText,
    Timestamp,
}

// ── Catalog ─────────────────────────────────────────────────────

/// Immutable lookup of metric definitions plus non-metric column names.
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    metrics: Vec<MetricDefinition>,
    fault_code_columns: Vec<String>,
    free_text_columns: Vec<String>,
    timestamp_columns: Vec<String>,
}

impl MetricCatalog {
    /// Catalog over the given metrics with the standard non-metric columns.
    pub fn new(metrics: Vec<MetricDefinition>) -> Self {
        let names = |list: &[&str]| list.iter().map(|s| normalize(s)).collect();
        Self {
            metrics,
            fault_code_columns: names(&["fault_codes", "dtc", "dtcs", "trouble_codes", "codes"]),
            free_text_columns: names(&["notes", "message", "comment", "comments", "events"]),
            timestamp_columns: names(&["timestamp", "time", "datetime"]),
        }
    }

    /// The ten standard OBD-II metrics.
    pub fn standard() -> Self {
        Self::new(vec![
            MetricDefinition::new(
                "engine_rpm",
                "RPM",
                "Engine revolutions per minute",
                &["rpm", "engine rpm", "eng_rpm"],
                &["revs", "engine speed", "idle"],
                Thresholds::banded((600.0, 7000.0), (200.0, 7500.0)),
            ),
            MetricDefinition::new(
                "coolant_temp",
                "°C",
                "Engine coolant temperature",
                &["coolant", "coolant_temperature", "ect", "engine_coolant_temp"],
                &["engine temperature", "engine temp", "overheating", "overheat"],
                Thresholds::banded((70.0, 105.0), (30.0, 120.0)),
            ),
            MetricDefinition::new(
                "vehicle_speed",
                "km/h",
                "Current vehicle speed",
                &["speed", "vss"],
                &["how fast"],
                Thresholds::banded((0.0, 200.0), (0.0, 220.0)),
            ),
            MetricDefinition::new(
                "throttle_position",
                "%",
                "Throttle pedal position percentage",
                &["throttle", "tps"],
                &["accelerator", "gas pedal"],
                Thresholds::banded((0.0, 100.0), (0.0, 100.0)),
            ),
            MetricDefinition::new(
                "engine_load",
                "%",
                "Calculated engine load percentage",
                &["load", "calculated_load"],
                &[],
                Thresholds::banded((0.0, 80.0), (0.0, 95.0)),
            ),
            MetricDefinition::new(
                "fuel_level",
                "%",
                "Fuel tank level percentage",
                &["fuel", "fuel_tank_level"],
                &["gas tank", "tank level"],
                Thresholds::banded((10.0, 100.0), (0.0, 100.0)),
            ),
            MetricDefinition::new(
                "intake_air_temp",
                "°C",
                "Intake manifold air temperature",
                &["iat", "intake_temp"],
                &["intake air", "air intake"],
                Thresholds::banded((-20.0, 60.0), (-40.0, 80.0)),
            ),
            MetricDefinition::new(
                "maf_rate",
                "g/s",
                "Mass air flow rate",
                &["maf", "mass_air_flow"],
                &["air flow", "airflow"],
                Thresholds::banded((2.0, 300.0), (0.0, 500.0)),
            ),
            MetricDefinition::new(
                "fuel_pressure",
                "kPa",
                "Fuel rail pressure",
                &["fp"],
                &["fuel rail"],
                Thresholds::banded((250.0, 450.0), (100.0, 600.0)),
            ),
            MetricDefinition::new(
                "battery_voltage",
                "V",
                "Battery/charging system voltage",
                &["battery", "voltage"],
                &["alternator", "charging"],
                Thresholds::banded((12.4, 14.7), (11.0, 16.0)),
            ),
        ])
    }

    pub fn definitions(&self) -> &[MetricDefinition] {
        &self.metrics
    }

    pub fn get(&self, name: &str) -> Option<&MetricDefinition> {
        self.metrics.iter().find(|m| m.name == name)
    }

    /// Map a header cell onto its role. Matching ignores case, surrounding
    /// whitespace, and treats spaces and hyphens like underscores.
    pub fn resolve_column(&self, header: &str) -> Option<ColumnRole> {
        let key = normalize(header);
        if key.is_empty() {
            return None;
        }
        if let Some(idx) = self
            .metrics
            .iter()
            .position(|m| m.synonyms.iter().any(|s| normalize(s) == key))
        {
            return Some(ColumnRole::Metric(idx));
        }
        if self.fault_code_columns.contains(&key) {
            Some(ColumnRole::FaultCodes)
        } else if self.timestamp_columns.contains(&key) {
            Some(ColumnRole::Timestamp)
        } else if self.free_text_columns.contains(&key) {
            Some(ColumnRole::FreeText)
        } else {
            None
        }
    }

    /// Band for `value` under the named metric's thresholds.
    /// Metrics absent from the catalog are always normal.
    pub fn classify_status(&self, name: &str, value: f64) -> Severity {
        self.get(name)
            .map(|m| m.thresholds.classify(value))
            .unwrap_or(Severity::Normal)
    }

    /// Metric that `text` names by canonical name, column synonym or
    /// keyword, matched on whole words. The longest matching phrase wins
    /// ("fuel pressure" over "fuel"); equal lengths go to catalog order.
    pub fn mentioned_in(&self, text: &str) -> Option<&MetricDefinition> {
        let haystack = format!(" {} ", normalize(text).replace('_', " "));
        let mut best: Option<(&MetricDefinition, usize)> = None;
        for m in &self.metrics {
            let longest = m
                .phrases()
                .map(|p| p.replace('_', " "))
                .filter(|p| haystack.contains(&format!(" {p} ")))
                .map(|p| p.len())
                .max();
            if let Some(len) = longest
                && best.is_none_or(|(_, b)| len > b)
            {
                best = Some((m, len));
            }
        }
        best.map(|(m, _)| m)
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Lowercase, collapse runs of whitespace/hyphens into a single underscore.
fn normalize(s: &str) -> String {
    let lowered = s.trim().to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for part in lowered
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_' || (c.is_ascii_punctuation() && c != '\''))
        .filter(|p| !p.is_empty())
    {
        if !out.is_empty() {
            out.push('_');
        }
        out.push_str(part);
    }
    out
}
