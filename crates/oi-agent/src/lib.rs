//! OBD Insight agent: library half of the `oi-agent` binary.
//!
//! Exposes the configuration, backend wiring and the in-memory
//! `DiagnosticSession` so `oi-e2e-tests` can drive the same code paths.

pub mod config;
pub mod runtime;
pub mod session;

pub use config::AssistantConfig;
pub use session::{DiagnosticSession, UploadReport};
