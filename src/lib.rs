//! Bazaar snapshot analysis: fetch order-book snapshots, normalise the
//! various payload shapes, derive per-item margins and rank the items.
//!
//! Pipeline: snapshot source -> [`market_data::normaliser`] ->
//! [`engine::margin`] -> [`engine::ranking`] -> [`report`] / [`persist`].

pub mod config;
pub mod engine;
pub mod market_data;
pub mod persist;
pub mod report;
pub mod telemetry;
