// File snapshot source: re-analyse a previously saved document

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, instrument};

use super::{SnapshotSource, SourceError};
use crate::engine::types::ProfitRecord;
use crate::market_data::normaliser::{NormaliseError, NormalisedSnapshot, Normaliser};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("{path} is not valid JSON: {source}")]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("{path} has an unrecognised structure: {source}")]
    Schema { path: PathBuf, source: NormaliseError },
    #[error("{path} looks like a saved result list but a record is invalid: {source}")]
    Records { path: PathBuf, source: serde_json::Error },
}

// What a saved file turned out to contain
#[derive(Debug)]
pub enum LoadedSnapshot {
    // Order books that still need margin calculation
    OrderBooks(NormalisedSnapshot),
    // A previously saved ranked result, already calculated
    Records(Vec<ProfitRecord>),
}

pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_document(&self) -> Result<Value, LoadError> {
        let text = std::fs::read_to_string(&self.path)
            .map_err(|source| LoadError::Io { path: self.path.clone(), source })?;
        serde_json::from_str(&text).map_err(|source| LoadError::Parse { path: self.path.clone(), source })
    }

    /// Load the file and work out whether it holds order books or saved records.
    #[instrument(skip(self, normaliser), fields(path = %self.path.display()))]
    pub fn load(&self, normaliser: &Normaliser) -> Result<LoadedSnapshot, LoadError> {
        let doc = self.read_document()?;

        // results files are arrays, snapshots are objects
        if doc.is_array() {
            let records: Vec<ProfitRecord> = serde_json::from_value(doc)
                .map_err(|source| LoadError::Records { path: self.path.clone(), source })?;
            info!(records = records.len(), "Loaded saved profit records");
            return Ok(LoadedSnapshot::Records(records));
        }

        let snapshot = normaliser
            .normalise(&doc)
            .map_err(|source| LoadError::Schema { path: self.path.clone(), source })?;
        info!(items = snapshot.books.len(), "Loaded bazaar snapshot from file");
        Ok(LoadedSnapshot::OrderBooks(snapshot))
    }
}

#[async_trait::async_trait]
impl SnapshotSource for FileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> Result<Value, SourceError> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        serde_json::from_str(&text).map_err(|e| SourceError::Parse(e.to_string()))
    }
}

pub fn load_from_file(path: &Path, normaliser: &Normaliser) -> Result<LoadedSnapshot, LoadError> {
    FileSource::new(path).load(normaliser)
}
