//! Pure conversions between in-memory analysis types and their persisted forms.
//!
//! This file MUST NOT touch the filesystem. Only struct <-> struct / string mapping lives here.

use crate::engine::types::ProfitRecord;
use crate::market_data::order_book::OrderBookMap;
use crate::persist::types::{CsvRow, PersistResult};

/// Flatten a profit record into the spreadsheet row.
pub fn csv_row_from_record(record: &ProfitRecord) -> CsvRow {
    CsvRow {
        item_id: record.item_id.clone(),
        buy_price: record.best_buy_price,
        sell_price: record.best_sell_price,
        margin: record.buy_order_to_sell_order_margin,
        profit_percent: record.buy_sell_order_percent,
        buy_volume: record.buy_volume,
        sell_volume: record.sell_volume,
    }
}

/// Records -> pretty JSON array, field-for-field.
pub fn records_to_json(records: &[ProfitRecord]) -> PersistResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Canonical books -> pretty JSON object keyed by item id. Reloads as a direct item map.
pub fn order_books_to_json(books: &OrderBookMap) -> PersistResult<String> {
    Ok(serde_json::to_string_pretty(books)?)
}
