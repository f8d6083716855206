//! Log source abstraction: read uploaded logs from disk or from memory.

use async_trait::async_trait;

use crate::error::{TelemetryError, TelemetryResult};

/// Abstraction over where uploaded log content comes from.
///
/// The upload collaborator hands over a path; tests swap in
/// `MockLogSource` to serve content without touching the filesystem.
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Read the whole file as UTF-8 text.
    async fn read_to_string(&self, path: &str) -> TelemetryResult<String>;

    /// Check if a source path exists and is readable.
    async fn exists(&self, path: &str) -> bool;
}

/// Reads logs from the local filesystem.
pub struct FileLogSource;

#[async_trait]
impl LogSource for FileLogSource {
    async fn read_to_string(&self, path: &str) -> TelemetryResult<String> {
        tokio::fs::read_to_string(path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => TelemetryError::NotFound(path.to_string()),
            std::io::ErrorKind::InvalidData => TelemetryError::Parse {
                line: 0,
                message: format!("{path} is not valid UTF-8 text"),
            },
            _ => TelemetryError::Io(format!("{path}: {e}")),
        })
    }

    async fn exists(&self, path: &str) -> bool {
        tokio::fs::metadata(path)
            .await
            .map(|m| m.is_file())
            .unwrap_or(false)
    }
}
