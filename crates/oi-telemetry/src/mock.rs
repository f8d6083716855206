//! Mock log source for testing: serves pre-loaded log content.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::{TelemetryError, TelemetryResult};
use crate::source::LogSource;

/// Path of the healthy sample served by `with_healthy_sample`.
pub const HEALTHY_SAMPLE_PATH: &str = "/uploads/healthy.csv";
/// Path of the faulty sample served by `with_faulty_sample`.
pub const FAULTY_SAMPLE_PATH: &str = "/uploads/faulty.csv";

/// A mock log source that serves pre-loaded content by path.
#[derive(Default)]
pub struct MockLogSource {
    files: HashMap<String, String>,
}

impl MockLogSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    pub fn add_file(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    /// A log from a car in good shape: every metric inside its normal range.
    pub fn with_healthy_sample() -> Self {
        let mut m = Self::new();
        m.add_file(HEALTHY_SAMPLE_PATH, HEALTHY_SAMPLE);
        m
    }

    /// A log with an overheating engine, a misfire and a weak battery.
    pub fn with_faulty_sample() -> Self {
        let mut m = Self::new();
        m.add_file(FAULTY_SAMPLE_PATH, FAULTY_SAMPLE);
        m
    }

    /// Both samples.
    pub fn with_samples() -> Self {
        let mut m = Self::with_healthy_sample();
        m.add_file(FAULTY_SAMPLE_PATH, FAULTY_SAMPLE);
        m
    }
}

const HEALTHY_SAMPLE: &str = "\
timestamp,rpm,coolant_temperature,speed,throttle,load,fuel,battery
2024-05-01 08:00:00,820,88,0,12,22,64,14.1
2024-05-01 08:00:05,2100,90,48,28,35,64,14.2
2024-05-01 08:00:10,2500,91,62,31,38,63,14.1
";

const FAULTY_SAMPLE: &str = "\
timestamp,engine_rpm,coolant_temp,vehicle_speed,battery_voltage,dtc,notes
2024-05-01T08:00:00Z,900,104,0,12.6,,cold start
2024-05-01T08:00:05Z,2600,118,55,12.1,P0300,rough idle
2024-05-01T08:00:10Z,2400,125,50,12.0,\"P0300,P1234\",\"light on, saw U0100\"
";

#[async_trait]
impl LogSource for MockLogSource {
    async fn read_to_string(&self, path: &str) -> TelemetryResult<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| TelemetryError::NotFound(path.to_string()))
    }

    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
