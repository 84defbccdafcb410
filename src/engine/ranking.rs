//! Ranker/filter over profit records.

use itertools::Itertools;
use ordered_float::OrderedFloat;
use tracing::{debug, instrument};

use crate::engine::types::{ProfitRecord, RankQuery};

/// True when `record` passes the volume, price and positive-metric filters.
pub fn passes_filter(record: &ProfitRecord, query: &RankQuery) -> bool {
    let liquid = record.buy_volume >= query.min_volume || record.sell_volume >= query.min_volume;
    // NaN compares false, so it never counts as profitable
    liquid && record.best_buy_price >= query.min_price && query.method.value(record) > 0.0
}

/// Filter, sort descending by the chosen metric and keep the first `top_n`.
/// Equal metric values are ordered by item id.
#[instrument(level = "debug", skip(records), fields(total = records.len(), method = %query.method))]
pub fn rank(records: &[ProfitRecord], query: &RankQuery) -> Vec<ProfitRecord> {
    let filtered: Vec<&ProfitRecord> = records.iter().filter(|r| passes_filter(r, query)).collect();
    debug!(matching = filtered.len(), "Filtered by volume/price criteria");

    filtered
        .into_iter()
        .sorted_by(|a, b| {
            OrderedFloat(query.method.value(b))
                .cmp(&OrderedFloat(query.method.value(a)))
                .then_with(|| a.item_id.cmp(&b.item_id))
        })
        .take(query.top_n)
        .cloned()
        .collect()
}

/// Number of records that pass the filter, ignoring `top_n`.
pub fn count_matching(records: &[ProfitRecord], query: &RankQuery) -> usize {
    records.iter().filter(|r| passes_filter(r, query)).count()
}
