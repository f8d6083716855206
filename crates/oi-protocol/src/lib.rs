pub mod document;
pub mod dtc;
pub mod severity;
pub mod telemetry;

pub use document::*;
pub use dtc::*;
pub use severity::*;
pub use telemetry::*;
