// Shared trait + errors for snapshot sources

use std::time::Duration;

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("could not build HTTP client: {0}")]
    Client(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("response is not valid JSON: {0}")]
    Parse(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync {
    // Human-readable label used in attempt summaries
    fn describe(&self) -> String;

    // Fetch one raw, still schema-ambiguous document.
    async fn fetch(&self) -> Result<Value, SourceError>;
}

pub mod bazaar_types;
pub mod file;
pub mod http;
