// Convert raw bazaar documents, whichever known shape they use, into
// canonical per-item order books.
//
// Top-level shapes are resolved by an ordered list of matchers; the first
// one that recognises the document wins. Per-item entries are then parsed
// independently, so a single bad item never sinks the whole snapshot.

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use crate::market_data::adapters::bazaar_types::{
    AlternateProduct, NativeProduct, ALTERNATE_FIELDS, CANONICAL_FIELD, NATIVE_FIELDS,
};
use crate::market_data::order_book::{CanonicalOrderBook, OrderBookMap};

pub const DEFAULT_DIRECT_MAP_MIN_KEYS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    Native,    // { "products": { ITEM: { buy_summary, sell_summary, quick_status } } }
    Wrapped,   // { "success": true, "bazaar": { ITEM: ... } }
    Alternate, // per-item buyOrders / sellOrders
    Direct,    // the document itself is the item map
}

#[derive(Debug, thiserror::Error)]
pub enum NormaliseError {
    #[error("unrecognised snapshot shape (top-level keys: {keys:?})")]
    UnrecognisedShape { keys: Vec<String> },
    #[error("snapshot is not a JSON object (found {found})")]
    NotAnObject { found: &'static str },
}

#[derive(Debug, thiserror::Error)]
pub enum ItemError {
    #[error("entry is not an object")]
    NotAnObject,
    #[error("malformed entry: {0}")]
    Malformed(String),
    #[error("negative or non-finite price {0}")]
    InvalidPrice(f64),
    #[error("negative or non-finite volume {0}")]
    InvalidVolume(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedSnapshot {
    pub shape: DocumentShape,
    pub books: OrderBookMap,
    pub excluded: usize, // items with no liquidity on one side
    pub errors: usize,   // malformed items that were skipped
}

struct ShapeMatch<'a> {
    shape: DocumentShape,
    items: &'a Map<String, Value>,
}

type Matcher = for<'a> fn(&Normaliser, &'a Map<String, Value>) -> Option<ShapeMatch<'a>>;

const MATCHERS: [Matcher; 4] = [match_native, match_wrapped, match_alternate, match_direct];

#[derive(Debug, Clone)]
pub struct Normaliser {
    // A bare top-level map must have more keys than this to count as an item map
    pub direct_map_min_keys: usize,
}

impl Default for Normaliser {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECT_MAP_MIN_KEYS)
    }
}

impl Normaliser {
    pub fn new(direct_map_min_keys: usize) -> Self {
        Self { direct_map_min_keys }
    }

    // Saved snapshot files are trusted to be item maps regardless of size.
    pub fn for_saved_files() -> Self {
        Self::new(0)
    }

    fn resolve<'a>(&self, doc: &'a Value) -> Result<ShapeMatch<'a>, NormaliseError> {
        let obj = doc.as_object().ok_or(NormaliseError::NotAnObject { found: json_type(doc) })?;
        MATCHERS
            .iter()
            .find_map(|matcher| matcher(self, obj))
            .ok_or_else(|| NormaliseError::UnrecognisedShape { keys: obj.keys().cloned().collect() })
    }

    #[instrument(level = "debug", skip(self, doc))]
    pub fn normalise(&self, doc: &Value) -> Result<NormalisedSnapshot, NormaliseError> {
        let ShapeMatch { shape, items } = self.resolve(doc)?;
        debug!(?shape, candidates = items.len(), "Resolved snapshot shape");

        let mut books = OrderBookMap::new();
        let mut excluded = 0;
        let mut errors = 0;

        for (item_id, entry) in items {
            match normalise_item(entry) {
                Ok(Some(book)) => {
                    books.insert(item_id.clone(), book);
                }
                Ok(None) => {
                    debug!(item = %item_id, "Skipping item with an empty order list");
                    excluded += 1;
                }
                Err(e) => {
                    warn!(item = %item_id, error = %e, "Error processing item");
                    errors += 1;
                }
            }
        }

        metrics::counter!("bazaar_items_normalised_total").increment(books.len() as u64);
        metrics::counter!("bazaar_items_skipped_total").increment((excluded + errors) as u64);
        info!(?shape, items = books.len(), excluded, errors, "Normalised bazaar snapshot");

        Ok(NormalisedSnapshot { shape, books, excluded, errors })
    }
}

fn match_native<'a>(_: &Normaliser, doc: &'a Map<String, Value>) -> Option<ShapeMatch<'a>> {
    let items = doc.get("products")?.as_object()?;
    looks_native(items).then_some(ShapeMatch { shape: DocumentShape::Native, items })
}

fn match_wrapped<'a>(_: &Normaliser, doc: &'a Map<String, Value>) -> Option<ShapeMatch<'a>> {
    // An explicit `success: false` means the mirror is reporting an error
    if doc.get("success").and_then(Value::as_bool) == Some(false) {
        return None;
    }
    let items = doc.get("bazaar")?.as_object()?;
    looks_native(items).then_some(ShapeMatch { shape: DocumentShape::Wrapped, items })
}

fn match_alternate<'a>(_: &Normaliser, doc: &'a Map<String, Value>) -> Option<ShapeMatch<'a>> {
    let containers = [
        doc.get("products").and_then(Value::as_object),
        doc.get("bazaar").and_then(Value::as_object),
        Some(doc),
    ];
    containers
        .into_iter()
        .flatten()
        .find(|items| any_entry_has(items, &ALTERNATE_FIELDS))
        .map(|items| ShapeMatch { shape: DocumentShape::Alternate, items })
}

fn match_direct<'a>(n: &Normaliser, doc: &'a Map<String, Value>) -> Option<ShapeMatch<'a>> {
    // a zero threshold trusts any map, empty included
    let accepted = n.direct_map_min_keys == 0 || doc.len() > n.direct_map_min_keys;
    accepted.then_some(ShapeMatch { shape: DocumentShape::Direct, items: doc })
}

fn looks_native(items: &Map<String, Value>) -> bool {
    items.is_empty() || any_entry_has(items, &NATIVE_FIELDS)
}

fn any_entry_has(items: &Map<String, Value>, fields: &[&str]) -> bool {
    items.values().any(|entry| has_any_field(entry, fields))
}

fn has_any_field(entry: &Value, fields: &[&str]) -> bool {
    entry.as_object().is_some_and(|o| fields.iter().any(|f| o.contains_key(*f)))
}

/// Parse one item entry. `Ok(None)` means the item has no liquidity on at
/// least one side and is left out of the map.
pub fn normalise_item(entry: &Value) -> Result<Option<CanonicalOrderBook>, ItemError> {
    let obj = entry.as_object().ok_or(ItemError::NotAnObject)?;

    let book = if obj.contains_key(CANONICAL_FIELD) {
        Some(from_canonical(entry)?)
    } else if has_any_field(entry, &ALTERNATE_FIELDS) {
        from_alternate(entry)?
    } else {
        from_native(entry)?
    };

    match book {
        Some(b) => {
            check_price(b.best_buy_order_price)?;
            check_price(b.best_sell_order_price)?;
            for quick in [b.quick_buy_price, b.quick_sell_price].into_iter().flatten() {
                check_price(quick)?;
            }
            Ok(Some(b))
        }
        None => Ok(None),
    }
}

fn from_native(entry: &Value) -> Result<Option<CanonicalOrderBook>, ItemError> {
    let product: NativeProduct =
        serde_json::from_value(entry.clone()).map_err(|e| ItemError::Malformed(e.to_string()))?;

    let (Some(buy_summary), Some(sell_summary)) = (product.buy_summary, product.sell_summary) else {
        return Ok(None);
    };
    let (Some(best_buy_order), Some(best_sell_order)) = (buy_summary.first(), sell_summary.first()) else {
        return Ok(None);
    };

    let quick = product.quick_status.unwrap_or_default();
    // sell list -> your buy price, buy list -> your sell price
    let book = CanonicalOrderBook::new(best_sell_order.price_per_unit, best_buy_order.price_per_unit)
        .with_volumes(volume(quick.buy_volume)?, volume(quick.sell_volume)?)
        .with_quick_prices(quick.sell_price, quick.buy_price);
    Ok(Some(book))
}

fn from_alternate(entry: &Value) -> Result<Option<CanonicalOrderBook>, ItemError> {
    let product: AlternateProduct =
        serde_json::from_value(entry.clone()).map_err(|e| ItemError::Malformed(e.to_string()))?;

    let (Some(buy_orders), Some(sell_orders)) = (product.buy_orders, product.sell_orders) else {
        return Ok(None);
    };
    let (Some(best_buy_order), Some(best_sell_order)) = (buy_orders.first(), sell_orders.first()) else {
        return Ok(None);
    };

    // No quick_status here: synthesise it from the head of each list
    let quick_buy = best_sell_order.price();
    let quick_sell = best_buy_order.price();
    let book = CanonicalOrderBook::new(best_sell_order.price(), best_buy_order.price())
        .with_volumes(volume(product.buy_volume)?, volume(product.sell_volume)?)
        .with_quick_prices(Some(quick_buy), Some(quick_sell));
    Ok(Some(book))
}

fn from_canonical(entry: &Value) -> Result<CanonicalOrderBook, ItemError> {
    serde_json::from_value(entry.clone()).map_err(|e| ItemError::Malformed(e.to_string()))
}

fn check_price(p: f64) -> Result<(), ItemError> {
    if p.is_finite() && p >= 0.0 {
        Ok(())
    } else {
        Err(ItemError::InvalidPrice(p))
    }
}

fn volume(v: Option<f64>) -> Result<u64, ItemError> {
    match v {
        None => Ok(0),
        Some(x) if x.is_finite() && x >= 0.0 => Ok(x as u64),
        Some(x) => Err(ItemError::InvalidVolume(x)),
    }
}

fn json_type(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn native_item(buy: f64, sell: f64, buy_volume: u64, sell_volume: u64) -> Value {
        json!({
            "product_id": "X",
            "buy_summary": [{ "amount": 64, "pricePerUnit": buy, "orders": 1 }, { "amount": 10, "pricePerUnit": buy - 1.0, "orders": 2 }],
            "sell_summary": [{ "amount": 32, "pricePerUnit": sell, "orders": 1 }],
            "quick_status": {
                "productId": "X",
                "buyPrice": buy,
                "sellPrice": sell,
                "buyVolume": buy_volume,
                "sellVolume": sell_volume,
                "buyMovingWeek": 123456,
                "sellMovingWeek": 654321
            }
        })
    }

    fn alternate_item(buy: f64, sell: f64, buy_volume: u64, sell_volume: u64) -> Value {
        json!({
            "buyOrders": [buy, buy - 1.0],
            "sellOrders": [{ "pricePerUnit": sell, "amount": 5 }],
            "buyVolume": buy_volume,
            "sellVolume": sell_volume
        })
    }

    fn many_native_items(n: usize) -> Map<String, Value> {
        (0..n)
            .map(|i| (format!("ITEM_{i:02}"), native_item(10.0 + i as f64, 12.0 + i as f64, 5000, 3000)))
            .collect()
    }

    #[test]
    fn test_native_shape_inverts_lists() {
        let doc = json!({ "success": true, "lastUpdated": 1, "products": { "A": native_item(10.0, 12.0, 5000, 3000) } });
        let snap = Normaliser::default().normalise(&doc).unwrap();
        assert_eq!(snap.shape, DocumentShape::Native);
        let a = &snap.books["A"];
        // sell list -> what we pay, buy list -> what we receive
        assert_eq!(a.best_buy_order_price, 12.0);
        assert_eq!(a.best_sell_order_price, 10.0);
        assert_eq!(a.buy_volume, 5000);
        assert_eq!(a.sell_volume, 3000);
        assert_eq!(a.quick_buy_price, Some(12.0));
        assert_eq!(a.quick_sell_price, Some(10.0));
    }

    #[test]
    fn test_wrapped_shape() {
        let doc = json!({ "success": true, "bazaar": { "A": native_item(10.0, 12.0, 5000, 3000) } });
        let snap = Normaliser::default().normalise(&doc).unwrap();
        assert_eq!(snap.shape, DocumentShape::Wrapped);
        assert_eq!(snap.books["A"].best_buy_order_price, 12.0);
    }

    #[test]
    fn test_wrapped_shape_rejected_when_unsuccessful() {
        let doc = json!({ "success": false, "bazaar": { "A": native_item(10.0, 12.0, 5000, 3000) } });
        match Normaliser::default().normalise(&doc) {
            Err(NormaliseError::UnrecognisedShape { keys }) => {
                assert_eq!(keys, vec!["bazaar".to_string(), "success".to_string()]);
            }
            other => panic!("expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_alternate_shape_synthesises_quick_status() {
        let doc = json!({ "products": { "A": alternate_item(10.0, 12.0, 5000, 3000) } });
        let snap = Normaliser::default().normalise(&doc).unwrap();
        assert_eq!(snap.shape, DocumentShape::Alternate);
        let a = &snap.books["A"];
        assert_eq!(a.best_buy_order_price, 12.0);
        assert_eq!(a.best_sell_order_price, 10.0);
        assert_eq!(a.quick_buy_price, Some(12.0));
        assert_eq!(a.quick_sell_price, Some(10.0));
        assert_eq!(a.buy_volume, 5000);
    }

    #[test]
    fn test_alternate_object_without_price_defaults_to_zero() {
        let entry = json!({ "buyOrders": [{ "amount": 3 }], "sellOrders": [4.5] });
        let book = normalise_item(&entry).unwrap().unwrap();
        assert_eq!(book.best_sell_order_price, 0.0);
        assert_eq!(book.best_buy_order_price, 4.5);
        assert_eq!(book.buy_volume, 0);
    }

    #[test]
    fn test_direct_shape_needs_more_than_threshold_keys() {
        let small = Value::Object(many_native_items(20));
        assert!(matches!(
            Normaliser::default().normalise(&small),
            Err(NormaliseError::UnrecognisedShape { .. })
        ));

        let big = Value::Object(many_native_items(21));
        let snap = Normaliser::default().normalise(&big).unwrap();
        assert_eq!(snap.shape, DocumentShape::Direct);
        assert_eq!(snap.books.len(), 21);

        // saved files are accepted at any size
        let snap = Normaliser::for_saved_files().normalise(&small).unwrap();
        assert_eq!(snap.books.len(), 20);
    }

    #[test]
    fn test_empty_map_accepted_at_zero_threshold() {
        let snap = Normaliser::for_saved_files().normalise(&json!({})).unwrap();
        assert_eq!(snap.shape, DocumentShape::Direct);
        assert!(snap.books.is_empty());

        assert!(matches!(
            Normaliser::default().normalise(&json!({})),
            Err(NormaliseError::UnrecognisedShape { .. })
        ));
    }

    #[test]
    fn test_shape_independence() {
        let native = json!({ "products": { "A": native_item(10.0, 12.0, 5000, 3000) } });
        let wrapped = json!({ "success": true, "bazaar": { "A": native_item(10.0, 12.0, 5000, 3000) } });
        let alternate = json!({ "products": { "A": alternate_item(10.0, 12.0, 5000, 3000) } });
        let mut direct_items = many_native_items(21);
        direct_items.insert("A".into(), native_item(10.0, 12.0, 5000, 3000));
        let direct = Value::Object(direct_items);

        let n = Normaliser::default();
        let expected = n.normalise(&native).unwrap().books["A"].clone();
        for doc in [&wrapped, &alternate, &direct] {
            assert_eq!(n.normalise(doc).unwrap().books["A"], expected);
        }
    }

    #[test]
    fn test_missing_or_empty_list_excludes_item() {
        let doc = json!({ "products": {
            "OK": native_item(10.0, 12.0, 1, 1),
            "NO_SELL": { "buy_summary": [{ "pricePerUnit": 1.0 }], "quick_status": {} },
            "EMPTY_BUY": { "buy_summary": [], "sell_summary": [{ "pricePerUnit": 1.0 }] }
        }});
        let snap = Normaliser::default().normalise(&doc).unwrap();
        assert_eq!(snap.books.keys().collect::<Vec<_>>(), vec!["OK"]);
        assert_eq!(snap.excluded, 2);
        assert_eq!(snap.errors, 0);
    }

    #[test]
    fn test_missing_volume_defaults_to_zero() {
        let entry = json!({ "buy_summary": [{ "pricePerUnit": 5.0 }], "sell_summary": [{ "pricePerUnit": 6.0 }] });
        let book = normalise_item(&entry).unwrap().unwrap();
        assert_eq!((book.buy_volume, book.sell_volume), (0, 0));
        assert_eq!(book.quick_buy_price, None);
    }

    #[test]
    fn test_bad_items_are_counted_not_fatal() {
        let doc = json!({ "products": {
            "OK": native_item(10.0, 12.0, 1, 1),
            "STRING_PRICE": { "buy_summary": [{ "pricePerUnit": "lots" }], "sell_summary": [{ "pricePerUnit": 1.0 }] },
            "NEGATIVE": { "buy_summary": [{ "pricePerUnit": 1.0 }], "sell_summary": [{ "pricePerUnit": -3.0 }] },
            "NOT_OBJECT": 42
        }});
        let snap = Normaliser::default().normalise(&doc).unwrap();
        assert_eq!(snap.books.len(), 1);
        assert_eq!(snap.errors, 3);
    }

    #[test]
    fn test_invalid_quick_price_rejected_in_every_form() {
        let mut native = native_item(10.0, 12.0, 5000, 3000);
        native["quick_status"]["sellPrice"] = json!(-1.0);
        assert!(matches!(normalise_item(&native), Err(ItemError::InvalidPrice(p)) if p == -1.0));

        let canonical = json!({
            "best_buy_order_price": 12.0,
            "best_sell_order_price": 10.0,
            "buy_volume": 5000,
            "sell_volume": 3000,
            "quick_buy_price": -1.0
        });
        assert!(matches!(normalise_item(&canonical), Err(ItemError::InvalidPrice(p)) if p == -1.0));
    }

    #[test]
    fn test_summary_amount_and_orders_are_not_validated() {
        let entry = json!({
            "buy_summary": [{ "amount": -64, "pricePerUnit": 10.0, "orders": 1.5 }],
            "sell_summary": [{ "amount": "many", "pricePerUnit": 12.0, "orders": -2 }],
            "quick_status": { "buyVolume": 5000, "sellVolume": 3000 }
        });
        let book = normalise_item(&entry).unwrap().unwrap();
        assert_eq!(book.best_buy_order_price, 12.0);
        assert_eq!(book.best_sell_order_price, 10.0);
    }

    #[test]
    fn test_canonical_entries_pass_through() {
        let book = CanonicalOrderBook::new(12.0, 10.0).with_volumes(5000, 3000).with_quick_prices(Some(12.5), None);
        let entry = serde_json::to_value(&book).unwrap();
        assert_eq!(normalise_item(&entry).unwrap(), Some(book));
    }

    #[test]
    fn test_empty_products_is_valid() {
        let snap = Normaliser::default().normalise(&json!({ "products": {} })).unwrap();
        assert_eq!(snap.shape, DocumentShape::Native);
        assert!(snap.books.is_empty());
    }

    #[test]
    fn test_non_object_document() {
        let err = Normaliser::default().normalise(&json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, NormaliseError::NotAnObject { found: "array" }));
        let err = Normaliser::default().normalise(&json!({ "cause": "Invalid key" })).unwrap_err();
        assert!(matches!(err, NormaliseError::UnrecognisedShape { .. }));
    }
}
