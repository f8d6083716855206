//! Telemetry parser: tabular OBD-II log → `ParsedLog`.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::{Arc, LazyLock};

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use oi_protocol::{FaultCode, Metric, MetricStatistics, ParsedLog};

use crate::catalog::{ColumnRole, MetricCatalog};
use crate::dtc_db::FaultCodeKb;
use crate::error::{TelemetryError, TelemetryResult};
use crate::source::LogSource;
use crate::tabular::{Delimiter, Table, read_table};

/// Codes in a dedicated code column may be packed without separators.
static CODE_COLUMN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[PCBU][0-9]{4}").unwrap());

/// Codes in free text must stand alone as words.
static FREE_TEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[PCBU][0-9]{4}\b").unwrap());

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d %H:%M:%S",
];

/// Outcome of checking an upload before parsing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    /// User-facing explanation, suitable for showing as-is.
    pub message: String,
}

impl Validation {
    fn ok(message: String) -> Self {
        Self {
            valid: true,
            message,
        }
    }

    fn reject(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Column layout of one table after header resolution.
#[derive(Debug, Default)]
struct ColumnMap {
    /// (catalog index, column index), first matching column per metric.
    metrics: Vec<(usize, usize)>,
    fault_codes: Vec<usize>,
    free_text: Vec<usize>,
    timestamp: Option<usize>,
}

impl ColumnMap {
    fn resolve(catalog: &MetricCatalog, headers: &[String]) -> Self {
        let mut map = Self::default();
        for (col, header) in headers.iter().enumerate() {
            match catalog.resolve_column(header) {
                Some(ColumnRole::Metric(idx)) => {
                    if !map.metrics.iter().any(|(m, _)| *m == idx) {
                        map.metrics.push((idx, col));
                    }
                }
                Some(ColumnRole::FaultCodes) => map.fault_codes.push(col),
                Some(ColumnRole::FreeText) => map.free_text.push(col),
                Some(ColumnRole::Timestamp) => {
                    map.timestamp.get_or_insert(col);
                }
                None => {}
            }
        }
        map.metrics.sort_unstable();
        map
    }

    /// Metric and fault-code columns: the ones that make a file an OBD-II log.
    fn recognized(&self) -> usize {
        self.metrics.len() + self.fault_codes.len()
    }
}

/// Parses uploaded diagnostic logs against a metric catalog and a DTC
/// knowledge base. Holds no per-file state, so one instance serves every
/// conversation.
#[derive(Clone)]
pub struct TelemetryParser {
    catalog: Arc<MetricCatalog>,
    kb: Arc<FaultCodeKb>,
}

impl TelemetryParser {
    pub fn new(catalog: Arc<MetricCatalog>, kb: Arc<FaultCodeKb>) -> Self {
        Self { catalog, kb }
    }

    pub fn catalog(&self) -> &Arc<MetricCatalog> {
        &self.catalog
    }

    pub fn knowledge_base(&self) -> &Arc<FaultCodeKb> {
        &self.kb
    }

    /// Check whether `path` looks like a usable OBD-II log.
    ///
    /// Never fails: every problem is reported through `Validation::message`.
    pub async fn validate(&self, path: &str, source: &dyn LogSource) -> Validation {
        if !source.exists(path).await {
            return Validation::reject("File does not exist");
        }
        let Some(delimiter) = delimiter_for(path) else {
            return Validation::reject(
                "File must be a .csv or .tsv file. Please upload a valid OBD-II log file.",
            );
        };
        let content = match source.read_to_string(path).await {
            Ok(c) => c,
            Err(e) => return Validation::reject(format!("Error reading file: {e}")),
        };
        let table = match read_table(&content, delimiter) {
            Ok(t) => t,
            Err(TelemetryError::Empty) => {
                return Validation::reject("File is empty. Please upload a valid OBD-II log file.");
            }
            Err(e) => return Validation::reject(format!("File is not a valid table: {e}")),
        };

        let columns = ColumnMap::resolve(&self.catalog, &table.headers);
        if columns.recognized() == 0 {
            return Validation::reject(
                "No valid OBD-II data found in file. Please ensure your log contains OBD-II metrics.",
            );
        }
        if table.rows.is_empty() {
            return Validation::reject("File is empty. Please upload a valid OBD-II log file.");
        }
        Validation::ok(format!(
            "Valid OBD-II log file with {} metrics detected.",
            columns.recognized()
        ))
    }

    /// Read and parse the log at `path`.
    pub async fn parse(&self, path: &str, source: &dyn LogSource) -> TelemetryResult<ParsedLog> {
        let delimiter = delimiter_for(path).ok_or_else(|| {
            TelemetryError::Validation(format!("{path}: unsupported file extension"))
        })?;
        let content = source.read_to_string(path).await?;
        let parsed = self.parse_content(&content, delimiter)?;
        tracing::info!(
            path = %path,
            rows = parsed.raw_row_count,
            metrics = parsed.metrics.len(),
            fault_codes = parsed.fault_codes.len(),
            "parsed OBD-II log"
        );
        Ok(parsed)
    }

    /// Parse log content already in memory.
    pub fn parse_content(&self, content: &str, delimiter: Delimiter) -> TelemetryResult<ParsedLog> {
        let table = read_table(content, delimiter)?;
        let columns = ColumnMap::resolve(&self.catalog, &table.headers);
        if columns.recognized() == 0 {
            return Err(TelemetryError::NoRecognizedColumns);
        }
        if table.rows.is_empty() {
            return Err(TelemetryError::Empty);
        }

        let (metrics, statistics) = self.extract_metrics(&table, &columns);
        let fault_codes = self.extract_fault_codes(&table, &columns);

        Ok(ParsedLog {
            metrics,
            fault_codes,
            raw_row_count: table.rows.len(),
            statistics,
        })
    }

    fn extract_metrics(
        &self,
        table: &Table,
        columns: &ColumnMap,
    ) -> (Vec<Metric>, BTreeMap<String, MetricStatistics>) {
        let mut metrics = Vec::new();
        let mut statistics = BTreeMap::new();

        for &(idx, col) in &columns.metrics {
            let def = &self.catalog.definitions()[idx];
            let mut samples = Vec::new();
            let mut latest_row = None;
            for row in &table.rows {
                if let Some(value) = parse_number(row.get(col)) {
                    samples.push(value);
                    latest_row = Some(row);
                }
            }

            let (Some(&value), Some(row)) = (samples.last(), latest_row) else {
                tracing::debug!(metric = %def.name, "column has no numeric values, skipping");
                continue;
            };

            metrics.push(Metric {
                name: def.name.clone(),
                value,
                unit: def.unit.clone(),
                status: def.thresholds.classify(value),
                timestamp: columns.timestamp.and_then(|c| parse_timestamp(row.get(c))),
            });
            if let Some(stats) = MetricStatistics::from_samples(&samples) {
                statistics.insert(def.name.clone(), stats);
            }
        }

        (metrics, statistics)
    }

    fn extract_fault_codes(&self, table: &Table, columns: &ColumnMap) -> Vec<FaultCode> {
        let mut codes = BTreeSet::new();
        for row in &table.rows {
            for &col in &columns.fault_codes {
                let cell = row.get(col).to_uppercase();
                codes.extend(CODE_COLUMN_PATTERN.find_iter(&cell).map(|m| m.as_str().to_string()));
            }
            for &col in &columns.free_text {
                let cell = row.get(col).to_uppercase();
                codes.extend(FREE_TEXT_PATTERN.find_iter(&cell).map(|m| m.as_str().to_string()));
            }
        }
        codes.iter().map(|code| self.kb.resolve(code)).collect()
    }
}

impl Default for TelemetryParser {
    fn default() -> Self {
        Self::new(
            Arc::new(MetricCatalog::standard()),
            Arc::new(FaultCodeKb::standard()),
        )
    }
}

fn delimiter_for(path: &str) -> Option<Delimiter> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Delimiter::from_extension)
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_timestamp(cell: &str) -> Option<DateTime<Utc>> {
    let cell = cell.trim();
    if cell.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(cell) {
        return Some(dt.with_timezone(&Utc));
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cell, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{MetricDefinition, Thresholds};
    use crate::mock::{FAULTY_SAMPLE_PATH, HEALTHY_SAMPLE_PATH, MockLogSource};
    use oi_protocol::Severity;

    fn parser() -> TelemetryParser {
        TelemetryParser::default()
    }

    fn parse_csv(content: &str) -> TelemetryResult<ParsedLog> {
        parser().parse_content(content, Delimiter::Comma)
    }

    // ── Metric classification ───────────────────────────────────

    #[test]
    fn rpm_2500_is_normal() {
        let log = parse_csv("engine_rpm\n2500\n").unwrap();
        assert_eq!(log.metrics[0].status, Severity::Normal);
        assert_eq!(log.metrics[0].unit, "RPM");
    }

    #[test]
    fn rpm_100_is_critical() {
        let log = parse_csv("rpm\n100\n").unwrap();
        assert_eq!(log.metric("engine_rpm").unwrap().status, Severity::Critical);
    }

    #[test]
    fn coolant_112_is_warning_and_125_critical() {
        let log = parse_csv("coolant_temp\n112\n").unwrap();
        assert_eq!(log.metrics[0].status, Severity::Warning);
        let log = parse_csv("coolant_temp\n125\n").unwrap();
        assert_eq!(log.metrics[0].status, Severity::Critical);
    }

    #[test]
    fn latest_row_is_representative() {
        let log = parse_csv("rpm,coolant\n100,125\n2500,90\n").unwrap();
        let rpm = log.metric("engine_rpm").unwrap();
        assert_eq!(rpm.value, 2500.0);
        assert_eq!(rpm.status, Severity::Normal);
        assert_eq!(log.metric("coolant_temp").unwrap().value, 90.0);
        assert_eq!(log.raw_row_count, 2);
    }

    #[test]
    fn non_numeric_cells_are_skipped() {
        let log = parse_csv("rpm,speed\n900,n/a\n1200,\nbad,40\n").unwrap();
        assert_eq!(log.metric("engine_rpm").unwrap().value, 1200.0);
        assert_eq!(log.metric("vehicle_speed").unwrap().value, 40.0);
        assert_eq!(log.statistics["engine_rpm"].samples, 2);
    }

    #[test]
    fn column_without_numbers_yields_no_metric() {
        let log = parse_csv("rpm,speed\n900,\n1000,\n").unwrap();
        assert!(log.metric("vehicle_speed").is_none());
        assert_eq!(log.metrics.len(), 1);
    }

    #[test]
    fn metrics_follow_catalog_order() {
        let log = parse_csv("battery,speed,rpm\n13.9,40,2000\n").unwrap();
        let names: Vec<_> = log.metrics.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["engine_rpm", "vehicle_speed", "battery_voltage"]);
    }

    #[test]
    fn statistics_cover_all_rows() {
        let log = parse_csv("rpm\n800\n1000\n1200\n").unwrap();
        let stats = &log.statistics["engine_rpm"];
        assert_eq!(stats.min, 800.0);
        assert_eq!(stats.max, 1200.0);
        assert_eq!(stats.mean, 1000.0);
        assert_eq!(stats.samples, 3);
    }

    #[test]
    fn timestamps_attach_to_latest_row() {
        let log = parse_csv("timestamp,rpm\n2024-05-01 08:00:00,900\n2024-05-01T08:00:05Z,950\n")
            .unwrap();
        let ts = log.metrics[0].timestamp.unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T08:00:05+00:00");
    }

    #[test]
    fn unparseable_timestamp_is_none() {
        let log = parse_csv("time,rpm\n12s,900\n").unwrap();
        assert!(log.metrics[0].timestamp.is_none());
    }

    // ── Fault codes ─────────────────────────────────────────────

    #[test]
    fn duplicate_fault_code_collapses_to_one() {
        let log = parse_csv("rpm,dtc\n900,P0300\n950,P0300\n").unwrap();
        assert_eq!(log.fault_codes.len(), 1);
        let fc = &log.fault_codes[0];
        assert_eq!(fc.code, "P0300");
        assert_eq!(fc.severity, Severity::Critical);
        assert!(fc.is_generic);
    }

    #[test]
    fn packed_and_lowercase_codes_are_found() {
        let log = parse_csv("codes\n\"p0171, P0420\"\nP0300P0301\n").unwrap();
        let codes: Vec<_> = log.fault_codes.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["P0171", "P0300", "P0301", "P0420"]);
    }

    #[test]
    fn free_text_codes_need_word_boundaries() {
        let log = parse_csv("rpm,notes\n900,saw U0100 on dash\n900,part P03001X\n").unwrap();
        let codes: Vec<_> = log.fault_codes.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["U0100"]);
    }

    #[test]
    fn unknown_code_is_kept_as_warning() {
        let log = parse_csv("dtc\nP1999\n").unwrap();
        let fc = &log.fault_codes[0];
        assert_eq!(fc.description, "Unknown diagnostic code");
        assert_eq!(fc.severity, Severity::Warning);
        assert!(!fc.is_generic);
    }

    #[test]
    fn fault_code_column_alone_is_enough() {
        let log = parse_csv("dtc\nP0420\n").unwrap();
        assert!(log.metrics.is_empty());
        assert_eq!(log.fault_codes.len(), 1);
    }

    // ── Errors ──────────────────────────────────────────────────

    #[test]
    fn no_recognized_columns_is_parse_error() {
        let err = parse_csv("odometer,notes\n12000,ok\n").unwrap_err();
        assert!(matches!(err, TelemetryError::NoRecognizedColumns));
        assert!(err.is_parse_error());
    }

    #[test]
    fn header_only_is_empty() {
        assert!(matches!(parse_csv("rpm,speed\n"), Err(TelemetryError::Empty)));
    }

    #[test]
    fn malformed_row_surfaces_line() {
        let err = parse_csv("rpm\n900\n1,2\n").unwrap_err();
        assert!(matches!(err, TelemetryError::Parse { line: 3, .. }));
    }

    // ── Injected tables ─────────────────────────────────────────

    #[test]
    fn custom_catalog_and_kb() {
        let catalog = MetricCatalog::new(vec![MetricDefinition::new(
            "oil_temp",
            "°C",
            "Engine oil temperature",
            &["oil"],
            &[],
            Thresholds::banded((80.0, 120.0), (60.0, 140.0)),
        )]);
        let kb = FaultCodeKb::from_entries([("P0300", "Custom misfire", Severity::Warning, vec![])]);
        let parser = TelemetryParser::new(Arc::new(catalog), Arc::new(kb));
        let log = parser
            .parse_content("oil,rpm,dtc\n130,900,P0300\n", Delimiter::Comma)
            .unwrap();
        assert_eq!(log.metrics.len(), 1);
        assert_eq!(log.metrics[0].status, Severity::Warning);
        assert_eq!(log.fault_codes[0].description, "Custom misfire");
        assert_eq!(log.fault_codes[0].severity, Severity::Warning);
    }

    // ── Async entry points ──────────────────────────────────────

    #[tokio::test]
    async fn parse_healthy_sample() {
        let source = MockLogSource::with_healthy_sample();
        let log = parser().parse(HEALTHY_SAMPLE_PATH, &source).await.unwrap();
        assert_eq!(log.raw_row_count, 3);
        assert_eq!(log.metrics.len(), 7);
        assert!(log.fault_codes.is_empty());
        assert!(!log.has_issues());
    }

    #[tokio::test]
    async fn parse_faulty_sample() {
        let source = MockLogSource::with_faulty_sample();
        let log = parser().parse(FAULTY_SAMPLE_PATH, &source).await.unwrap();
        assert_eq!(log.metric("coolant_temp").unwrap().status, Severity::Critical);
        assert_eq!(log.metric("battery_voltage").unwrap().status, Severity::Warning);
        let codes: Vec<_> = log.fault_codes.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["P0300", "P1234", "U0100"]);
    }

    #[tokio::test]
    async fn parse_rejects_unknown_extension() {
        let mut source = MockLogSource::new();
        source.add_file("/uploads/log.xlsx", "rpm\n900\n");
        let err = parser().parse("/uploads/log.xlsx", &source).await.unwrap_err();
        assert!(matches!(err, TelemetryError::Validation(_)));
    }

    #[tokio::test]
    async fn parse_tsv() {
        let mut source = MockLogSource::new();
        source.add_file("/uploads/log.tsv", "rpm\tcoolant\n900\t88\n");
        let log = parser().parse("/uploads/log.tsv", &source).await.unwrap();
        assert_eq!(log.metrics.len(), 2);
    }

    #[tokio::test]
    async fn parse_missing_file() {
        let err = parser()
            .parse("/uploads/missing.csv", &MockLogSource::new())
            .await
            .unwrap_err();
        assert!(matches!(err, TelemetryError::NotFound(_)));
    }

    #[tokio::test]
    async fn validate_accepts_sample() {
        let source = MockLogSource::with_healthy_sample();
        let v = parser().validate(HEALTHY_SAMPLE_PATH, &source).await;
        assert!(v.valid, "{}", v.message);
        assert_eq!(v.message, "Valid OBD-II log file with 7 metrics detected.");
    }

    #[tokio::test]
    async fn validate_reports_reasons_without_failing() {
        let mut source = MockLogSource::new();
        source.add_file("/u/notes.txt", "rpm\n900\n");
        source.add_file("/u/empty.csv", "");
        source.add_file("/u/header.csv", "rpm,speed\n");
        source.add_file("/u/other.csv", "odometer\n12000\n");
        source.add_file("/u/broken.csv", "rpm\n\"900\n");
        let p = parser();

        let v = p.validate("/u/missing.csv", &source).await;
        assert_eq!((v.valid, v.message.as_str()), (false, "File does not exist"));
        let v = p.validate("/u/notes.txt", &source).await;
        assert!(!v.valid && v.message.contains(".csv"));
        let v = p.validate("/u/empty.csv", &source).await;
        assert!(!v.valid && v.message.starts_with("File is empty"));
        let v = p.validate("/u/header.csv", &source).await;
        assert!(!v.valid && v.message.starts_with("File is empty"));
        let v = p.validate("/u/other.csv", &source).await;
        assert!(!v.valid && v.message.starts_with("No valid OBD-II data"));
        let v = p.validate("/u/broken.csv", &source).await;
        assert!(!v.valid && v.message.contains("unterminated"));
    }
}
