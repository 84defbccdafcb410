// Human-readable rendering of ranked results and source summaries.
use std::fmt::Write;

use crate::engine::types::{ProfitRecord, RankMethod};
use crate::market_data::router::SourceAttempt;

pub const NO_OPPORTUNITIES: &str = "No profit opportunities to display.";

/// Render the ranked records as a fixed-width table.
pub fn render_table(records: &[ProfitRecord], method: RankMethod) -> String {
    if records.is_empty() {
        return NO_OPPORTUNITIES.to_string();
    }

    let value_header = if method.is_percent() { "Profit %" } else { "Margin (coins)" };
    let header = format!(
        "{:<25} {:<12} {:<12} {:<15} {:<10}",
        "Item ID", "Buy Price", "Sell Price", value_header, "Volume"
    );

    let mut out = String::new();
    let _ = writeln!(out, "===== TOP PROFIT OPPORTUNITIES =====");
    let _ = writeln!(out, "{header}");
    let _ = writeln!(out, "{}", "-".repeat(header.len()));

    for r in records {
        let value = method.value(r);
        let value_cell = if method.is_percent() { format!("{value:.2}%") } else { format!("{value:.2}") };
        let _ = writeln!(
            out,
            "{:<25} {:<12.2} {:<12.2} {:<15} {:<10}",
            r.item_id,
            r.best_buy_price,
            r.best_sell_price,
            value_cell,
            r.buy_volume.max(r.sell_volume)
        );
    }
    out
}

pub fn render_attempts(attempts: &[SourceAttempt]) -> String {
    attempts.iter().map(|a| format!("  - {a}\n")).collect()
}

pub fn remediation_message(program: &str) -> String {
    format!(
        "All attempts to get bazaar data failed.\n\
         Options:\n\
         1. Check your internet connection\n\
         2. The bazaar API might be down - try again later\n\
         3. If you previously saved bazaar data, use the -f option to load it:\n   \
         {program} -f bazaar_raw_data_YYYYMMDD_HHMMSS.json"
    )
}
