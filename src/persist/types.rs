use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("I/O failure writing {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error("serialization failure: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV failure writing {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },
}

pub type PersistResult<T> = Result<T, PersistError>;

// Flat row of the spreadsheet export
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CsvRow {
    pub item_id: String,
    pub buy_price: f64,
    pub sell_price: f64,
    pub margin: f64,
    pub profit_percent: f64,
    pub buy_volume: u64,
    pub sell_volume: u64,
}

// Where a persisted report ended up
#[derive(Debug, Clone, PartialEq)]
pub struct SavedReport {
    pub json_path: PathBuf,
    pub csv_path: PathBuf,
    pub records: usize,
}
