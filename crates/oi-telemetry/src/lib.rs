//! OBD-II telemetry ingestion.
//!
//! Reads tabular diagnostic logs (CSV/TSV), maps their columns onto a fixed
//! metric catalog, classifies each metric against its threshold table, and
//! resolves diagnostic trouble codes through a static knowledge base.
//! File access goes through `LogSource` so tests can serve logs from memory.

pub mod catalog;
pub mod dtc_db;
pub mod error;
pub mod mock;
pub mod parser;
pub mod source;
pub mod tabular;

pub use catalog::{MetricCatalog, MetricDefinition, Thresholds};
pub use dtc_db::FaultCodeKb;
pub use error::{TelemetryError, TelemetryResult};
pub use mock::MockLogSource;
pub use parser::{TelemetryParser, Validation};
pub use source::{FileLogSource, LogSource};
pub use tabular::Delimiter;
