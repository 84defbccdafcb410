use std::fmt;

use serde::{Deserialize, Serialize};

// Derived per-item metrics. Built once by the margin calculator, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitRecord {
    pub item_id: String,
    pub best_buy_price: f64,  // what you pay (from the counter-party sell list)
    pub best_sell_price: f64, // what you get (from the counter-party buy list)
    pub quick_buy: f64,
    pub quick_sell: f64,

    // Raw margins
    pub buy_order_to_sell_order_margin: f64,
    pub buy_order_to_quick_sell_margin: f64,
    pub quick_buy_to_sell_order_margin: f64,

    // Percentage margins
    pub buy_sell_order_percent: f64,
    pub quick_buy_sell_percent: f64,

    pub buy_volume: u64,
    pub sell_volume: u64,
}

// Metric used to rank records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum RankMethod {
    #[default]
    BuySellOrderPercent,
    QuickBuySellPercent,
    BuyOrderToSellOrderMargin,
    QuickBuyToSellOrderMargin,
}

impl RankMethod {
    pub fn value(&self, record: &ProfitRecord) -> f64 {
        match self {
            RankMethod::BuySellOrderPercent => record.buy_sell_order_percent,
            RankMethod::QuickBuySellPercent => record.quick_buy_sell_percent,
            RankMethod::BuyOrderToSellOrderMargin => record.buy_order_to_sell_order_margin,
            RankMethod::QuickBuyToSellOrderMargin => record.quick_buy_to_sell_order_margin,
        }
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, RankMethod::BuySellOrderPercent | RankMethod::QuickBuySellPercent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RankMethod::BuySellOrderPercent => "buy_sell_order_percent",
            RankMethod::QuickBuySellPercent => "quick_buy_sell_percent",
            RankMethod::BuyOrderToSellOrderMargin => "buy_order_to_sell_order_margin",
            RankMethod::QuickBuyToSellOrderMargin => "quick_buy_to_sell_order_margin",
        }
    }
}

impl fmt::Display for RankMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankQuery {
    pub method: RankMethod,
    pub min_volume: u64,
    pub min_price: f64,
    pub top_n: usize,
}

impl Default for RankQuery {
    fn default() -> Self {
        Self {
            method: RankMethod::default(),
            min_volume: 1000,
            min_price: 0.0,
            top_n: 20,
        }
    }
}
