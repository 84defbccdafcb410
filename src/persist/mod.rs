pub mod types;
pub use types::*;
pub mod files;
pub mod snapshot;

use std::path::{Path, PathBuf};

use crate::engine::types::ProfitRecord;
use crate::market_data::order_book::OrderBookMap;

pub trait ReportStore {
    // Save ranked records as JSON plus a CSV sibling; `path` overrides the default name.
    fn persist(&self, records: &[ProfitRecord], path: Option<&Path>) -> PersistResult<SavedReport>;
    // Save the normalised books so the run can be repeated offline.
    fn save_order_books(&self, books: &OrderBookMap) -> PersistResult<PathBuf>;
}
