// Market data module entrypoint
pub mod adapters;   // snapshot sources (HTTP endpoints, saved files)
pub mod normaliser; // raw documents -> canonical order books
pub mod order_book; // canonical per-item book
pub mod router;     // fallback through candidate sources
