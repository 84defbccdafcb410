//! Margin calculator: canonical order book -> profit metrics.
//!
//! Everything here is pure. Degenerate input (zero prices) produces zeroed
//! percentages rather than an error or a NaN.

use tracing::{debug, instrument};

use crate::engine::types::ProfitRecord;
use crate::market_data::order_book::{CanonicalOrderBook, OrderBookMap};

/// Build the profit record for a single item.
pub fn calculate(item_id: &str, book: &CanonicalOrderBook) -> ProfitRecord {
    let best_buy_price = book.best_buy_order_price;
    let best_sell_price = book.best_sell_order_price;

    // Quick prices fall back to the order-list prices when the source has none
    let quick_buy = book.quick_buy_price.unwrap_or(best_buy_price);
    let quick_sell = book.quick_sell_price.unwrap_or(best_sell_price);

    let buy_order_to_sell_order_margin = best_sell_price - best_buy_price;
    let buy_order_to_quick_sell_margin = quick_sell - best_buy_price;
    let quick_buy_to_sell_order_margin = best_sell_price - quick_buy;

    ProfitRecord {
        item_id: item_id.to_string(),
        best_buy_price,
        best_sell_price,
        quick_buy,
        quick_sell,
        buy_order_to_sell_order_margin,
        buy_order_to_quick_sell_margin,
        quick_buy_to_sell_order_margin,
        buy_sell_order_percent: percent_of(buy_order_to_sell_order_margin, best_buy_price),
        quick_buy_sell_percent: percent_of(quick_buy_to_sell_order_margin, quick_buy),
        buy_volume: book.buy_volume,
        sell_volume: book.sell_volume,
    }
}

/// Profit records for every item, in item-id order.
#[instrument(level = "debug", skip(books), fields(items = books.len()))]
pub fn calculate_all(books: &OrderBookMap) -> Vec<ProfitRecord> {
    let records: Vec<ProfitRecord> = books
        .iter()
        .map(|(item_id, book)| calculate(item_id, book))
        .collect();
    debug!(records = records.len(), "Calculated profit margins");
    records
}

fn percent_of(margin: f64, base: f64) -> f64 {
    if base > 0.0 {
        margin / base * 100.0
    } else {
        0.0
    }
}
