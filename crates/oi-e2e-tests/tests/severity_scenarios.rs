//! E2E tests for status thresholds and answer severity tagging.

mod helpers;

use helpers::{FAULTY, HEALTHY, TestHarness};
use oi_protocol::{DtcCategory, FaultCode, Metric, Severity};
use oi_rag::SeverityClassifier;

/// Boundary table: rpm 2500 normal, rpm 100 critical, coolant 112 warning,
/// coolant 125 critical.
#[tokio::test]
async fn e2e_threshold_boundaries_through_upload() {
    let mut h = TestHarness::offline().await;
    let cases = [
        ("engine_rpm", "2500", Severity::Normal),
        ("engine_rpm", "100", Severity::Critical),
        ("coolant_temp", "112", Severity::Warning),
        ("coolant_temp", "125", Severity::Critical),
    ];

    for (i, (column, value, expected)) in cases.iter().enumerate() {
        let path = format!("/uploads/case{i}.csv");
        h.add_file(&path, &format!("{column}\n{value}\n"));
        let session = {
            let mut s = h.session();
            s.upload(&path, &h.source).await.unwrap();
            s
        };
        let metric = session.log().unwrap().metric(column).unwrap();
        assert_eq!(metric.status, *expected, "{column}={value}");
    }
}

/// P0300 in two rows parses to exactly one critical, generic entry.
#[tokio::test]
async fn e2e_repeated_code_deduplicated() {
    let h = TestHarness::offline().await;
    let session = h.session_with(FAULTY).await;
    let log = session.log().unwrap();

    let p0300: Vec<&FaultCode> = log.fault_codes.iter().filter(|f| f.code == "P0300").collect();
    assert_eq!(p0300.len(), 1);
    assert_eq!(p0300[0].severity, Severity::Critical);
    assert!(p0300[0].is_generic);

    let codes: Vec<&str> = log.fault_codes.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["P0300", "P1234", "U0100"]);
    let unknown = &log.fault_codes[1];
    assert_eq!(unknown.description, "Unknown diagnostic code");
    assert_eq!(unknown.severity, Severity::Warning);
    assert!(!unknown.is_generic);
}

/// Critical metric overrides warning text and a warning fault code.
#[test]
fn e2e_critical_metric_overrides_warning_signals() {
    let metric = Metric {
        name: "coolant_temp".into(),
        value: 125.0,
        unit: "°C".into(),
        status: Severity::Critical,
        timestamp: None,
    };
    let code = FaultCode {
        code: "P0171".into(),
        description: "System Too Lean (Bank 1)".into(),
        severity: Severity::Warning,
        category: DtcCategory::Powertrain,
        is_generic: true,
        possible_causes: vec![],
    };
    let severity = SeverityClassifier::new().classify(
        "Your vehicle needs attention soon.",
        &[metric],
        &[code],
    );
    assert_eq!(severity, Severity::Critical);
}

/// Model wording escalates a healthy log, unless negated.
#[tokio::test]
async fn e2e_answer_text_escalates_healthy_log() {
    let urgent = TestHarness::with_ollama_reply("Pull over and stop driving immediately.").await;
    let mut session = urgent.session_with(HEALTHY).await;
    let answer = session.ask("Is it safe to drive?").await.unwrap();
    assert_eq!(answer.severity, Severity::Critical);

    let calm = TestHarness::with_ollama_reply("This is not dangerous and there is no immediate risk.").await;
    let mut session = calm.session_with(HEALTHY).await;
    let answer = session.ask("Is it safe to drive?").await.unwrap();
    assert_eq!(answer.severity, Severity::Normal);

    let watch = TestHarness::with_ollama_reply("Keep monitoring it and schedule an inspection.").await;
    let mut session = watch.session_with(HEALTHY).await;
    let answer = session.ask("Is it safe to drive?").await.unwrap();
    assert_eq!(answer.severity, Severity::Warning);
}

/// Explaining a code tags the answer with the code's own severity.
#[tokio::test]
async fn e2e_explain_code_severity() {
    let h = TestHarness::offline().await;
    let mut session = h.session_with(HEALTHY).await;

    assert_eq!(session.explain("P0300").await.severity, Severity::Critical);
    assert_eq!(session.explain("P0420").await.severity, Severity::Warning);
    assert_eq!(session.explain("P0456").await.severity, Severity::Normal);
    assert_eq!(session.explain("B1999").await.severity, Severity::Warning);
}

/// A model answer with cautious wording does not lift the code's severity.
#[tokio::test]
async fn e2e_explain_code_severity_with_model_answer() {
    let h = TestHarness::with_ollama_reply("Schedule an inspection soon to be safe.").await;
    let mut session = h.session_with(HEALTHY).await;

    let answer = session.explain("P0456").await;
    assert_eq!(answer.generated_by, "ollama");
    assert_eq!(answer.severity, Severity::Normal);

    let answer = session.explain("P0420").await;
    assert_eq!(answer.generated_by, "ollama");
    assert_eq!(answer.severity, Severity::Warning);
}
