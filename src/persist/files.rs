use std::path::{Path, PathBuf};

use tracing::info;

use crate::engine::types::ProfitRecord;
use crate::market_data::order_book::OrderBookMap;
use crate::persist::snapshot::{csv_row_from_record, order_books_to_json, records_to_json};
use crate::persist::types::{PersistError, PersistResult, SavedReport};
use crate::persist::ReportStore;

pub const CSV_HEADER: [&str; 7] =
    ["item_id", "buy_price", "sell_price", "margin", "profit_percent", "buy_volume", "sell_volume"];

// Writes reports and snapshots as flat files under one directory
pub struct FileReportStore {
    output_dir: PathBuf,
}

impl FileReportStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }

    fn timestamped(&self, prefix: &str) -> PathBuf {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        self.output_dir.join(format!("{prefix}_{stamp}.json"))
    }

    fn write_text(path: &Path, text: &str) -> PersistResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| PersistError::Io { path: parent.to_path_buf(), source })?;
        }
        std::fs::write(path, text).map_err(|source| PersistError::Io { path: path.to_path_buf(), source })
    }

    fn write_csv(path: &Path, records: &[ProfitRecord]) -> PersistResult<()> {
        let csv_err = |source: csv::Error| PersistError::Csv { path: path.to_path_buf(), source };

        // header written by hand so an empty report still has one
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_path(path).map_err(csv_err)?;
        writer.write_record(CSV_HEADER).map_err(csv_err)?;
        for record in records {
            writer.serialize(csv_row_from_record(record)).map_err(csv_err)?;
        }
        writer.flush().map_err(|e| csv_err(e.into()))
    }
}

impl ReportStore for FileReportStore {
    fn persist(&self, records: &[ProfitRecord], path: Option<&Path>) -> PersistResult<SavedReport> {
        let json_path = match path {
            Some(p) => p.to_path_buf(),
            None => self.timestamped("bazaar_profit_analysis"),
        };
        Self::write_text(&json_path, &records_to_json(records)?)?;
        info!(path = %json_path.display(), records = records.len(), "Saved profit analysis");

        let csv_path = json_path.with_extension("csv");
        Self::write_csv(&csv_path, records)?;
        info!(path = %csv_path.display(), "Saved CSV export");

        Ok(SavedReport { json_path, csv_path, records: records.len() })
    }

    fn save_order_books(&self, books: &OrderBookMap) -> PersistResult<PathBuf> {
        let path = self.timestamped("bazaar_raw_data");
        Self::write_text(&path, &order_books_to_json(books)?)?;
        info!(path = %path.display(), items = books.len(), "Saved normalised bazaar data");
        Ok(path)
    }
}
