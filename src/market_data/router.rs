// Router walks the candidate sources in order and returns the first snapshot
// that both fetches and normalises.
use std::fmt;
use std::path::PathBuf;

use tracing::{info, instrument, warn};

use crate::market_data::adapters::SnapshotSource;
use crate::market_data::normaliser::{NormalisedSnapshot, Normaliser};

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Succeeded { items: usize },
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceAttempt {
    pub source: String,
    pub outcome: AttemptOutcome,
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            AttemptOutcome::Succeeded { items } => write!(f, "{}: ok ({} items)", self.source, items),
            AttemptOutcome::Failed(reason) => write!(f, "{}: failed ({})", self.source, reason),
        }
    }
}

#[derive(Debug)]
pub struct RoutedSnapshot {
    pub source: String,
    pub snapshot: NormalisedSnapshot,
    pub attempts: Vec<SourceAttempt>,
}

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("all {} snapshot sources failed", attempts.len())]
    AllSourcesFailed { attempts: Vec<SourceAttempt> },
}

pub struct SourceRouter {
    sources: Vec<Box<dyn SnapshotSource>>,
    normaliser: Normaliser,
    raw_response_path: Option<PathBuf>, // debugging copy of the last good body
}

impl SourceRouter {
    pub fn new(sources: Vec<Box<dyn SnapshotSource>>, normaliser: Normaliser) -> Self {
        Self { sources, normaliser, raw_response_path: None }
    }

    pub fn with_raw_response_path(mut self, path: Option<PathBuf>) -> Self {
        self.raw_response_path = path;
        self
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    #[instrument(skip(self), fields(sources = self.sources.len()))]
    pub async fn fetch_first_available(&self) -> Result<RoutedSnapshot, RouterError> {
        let mut attempts = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let label = source.describe();
            info!(source = %label, "Trying snapshot source");
            metrics::counter!("bazaar_source_attempts_total").increment(1);

            let doc = match source.fetch().await {
                Ok(doc) => doc,
                Err(e) => {
                    warn!(source = %label, error = %e, "Snapshot source failed");
                    attempts.push(SourceAttempt { source: label, outcome: AttemptOutcome::Failed(e.to_string()) });
                    continue;
                }
            };

            self.dump_raw_response(&doc);

            match self.normaliser.normalise(&doc) {
                Ok(snapshot) => {
                    let items = snapshot.books.len();
                    info!(source = %label, items, "Fetched bazaar snapshot");
                    attempts.push(SourceAttempt { source: label.clone(), outcome: AttemptOutcome::Succeeded { items } });
                    return Ok(RoutedSnapshot { source: label, snapshot, attempts });
                }
                Err(e) => {
                    // schema errors carry the offending top-level keys
                    warn!(source = %label, error = %e, "Unexpected snapshot structure");
                    attempts.push(SourceAttempt { source: label, outcome: AttemptOutcome::Failed(e.to_string()) });
                }
            }
        }

        Err(RouterError::AllSourcesFailed { attempts })
    }

    fn dump_raw_response(&self, doc: &serde_json::Value) {
        let Some(path) = &self.raw_response_path else { return };
        let written = serde_json::to_string_pretty(doc)
            .map_err(std::io::Error::from)
            .and_then(|text| std::fs::write(path, text));
        match written {
            Ok(()) => info!(path = %path.display(), "Saved raw response"),
            Err(e) => warn!(path = %path.display(), error = %e, "Could not save raw response"),
        }
    }
}
