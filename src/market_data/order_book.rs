use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Canonical top-of-book for one bazaar item, whatever shape it arrived in.
//
// Naming follows the trader's point of view: `best_buy_order_price` is what
// you pay (taken from the counter-party *sell* list) and
// `best_sell_order_price` is what you receive (from the *buy* list).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalOrderBook {
    pub best_buy_order_price: f64,
    pub best_sell_order_price: f64,
    #[serde(default)]
    pub buy_volume: u64,
    #[serde(default)]
    pub sell_volume: u64,
    // Pre-aggregated prices some sources report alongside the lists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_buy_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quick_sell_price: Option<f64>,
}

impl CanonicalOrderBook {
    pub fn new(best_buy_order_price: f64, best_sell_order_price: f64) -> Self {
        Self {
            best_buy_order_price,
            best_sell_order_price,
            buy_volume: 0,
            sell_volume: 0,
            quick_buy_price: None,
            quick_sell_price: None,
        }
    }

    pub fn with_volumes(mut self, buy_volume: u64, sell_volume: u64) -> Self {
        self.buy_volume = buy_volume;
        self.sell_volume = sell_volume;
        self
    }

    pub fn with_quick_prices(mut self, quick_buy: Option<f64>, quick_sell: Option<f64>) -> Self {
        self.quick_buy_price = quick_buy;
        self.quick_sell_price = quick_sell;
        self
    }
}

/// Item id -> canonical book. Ordered so downstream output is deterministic.
pub type OrderBookMap = BTreeMap<String, CanonicalOrderBook>;
