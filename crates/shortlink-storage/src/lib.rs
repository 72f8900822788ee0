//! Durable store adapters for URL records.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use shortlink_core::store::{Result, UrlStore};
pub use shortlink_core::StorageError;
