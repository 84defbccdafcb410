// Wire types for the per-item entries the bazaar APIs return.
// Only the fields the normaliser needs are modelled; the rest (amount, orders,
// moving-week totals) are ignored.

// Native shape (api.hypixel.net/skyblock/bazaar -> products.<ITEM>)
#[derive(Debug, serde::Deserialize)]
pub struct NativeProduct {
    #[serde(default)]
    pub buy_summary: Option<Vec<SummaryEntry>>,  // counter-party buy orders
    #[serde(default)]
    pub sell_summary: Option<Vec<SummaryEntry>>, // counter-party sell orders
    #[serde(default)]
    pub quick_status: Option<QuickStatus>,
}

#[derive(Debug, serde::Deserialize)]
pub struct SummaryEntry {
    #[serde(rename = "pricePerUnit")]
    pub price_per_unit: f64,
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct QuickStatus {
    #[serde(rename = "buyPrice", default)]
    pub buy_price: Option<f64>,
    #[serde(rename = "sellPrice", default)]
    pub sell_price: Option<f64>,
    #[serde(rename = "buyVolume", default)]
    pub buy_volume: Option<f64>,
    #[serde(rename = "sellVolume", default)]
    pub sell_volume: Option<f64>,
}

// Alternate shape used by some third-party mirrors
#[derive(Debug, serde::Deserialize)]
pub struct AlternateProduct {
    #[serde(rename = "buyOrders", default)]
    pub buy_orders: Option<Vec<AlternateOrder>>,
    #[serde(rename = "sellOrders", default)]
    pub sell_orders: Option<Vec<AlternateOrder>>,
    #[serde(rename = "buyVolume", default)]
    pub buy_volume: Option<f64>,
    #[serde(rename = "sellVolume", default)]
    pub sell_volume: Option<f64>,
}

// Either a bare price or an object carrying one
#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
pub enum AlternateOrder {
    Bare(f64),
    Priced {
        #[serde(rename = "pricePerUnit", default)]
        price_per_unit: f64,
    },
}

impl AlternateOrder {
    pub fn price(&self) -> f64 {
        match self {
            AlternateOrder::Bare(p) => *p,
            AlternateOrder::Priced { price_per_unit } => *price_per_unit,
        }
    }
}

// Field names used to tell the per-item shapes apart
pub const NATIVE_FIELDS: [&str; 3] = ["buy_summary", "sell_summary", "quick_status"];
pub const ALTERNATE_FIELDS: [&str; 2] = ["buyOrders", "sellOrders"];
pub const CANONICAL_FIELD: &str = "best_buy_order_price";
