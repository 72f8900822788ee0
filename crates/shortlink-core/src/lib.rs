//! Core types and traits for the shortlink URL shortener.
//!
//! This crate holds the data model shared by every other crate and the two
//! collaborator contracts the resolution service is built on: a durable
//! [`UrlStore`] and a disposable [`UrlCache`].

pub mod cache;
pub mod error;
pub mod record;
pub mod shortcode;
pub mod store;

pub use cache::UrlCache;
pub use error::{CacheError, StorageError};
pub use record::{NewUrlRecord, UrlRecord};
pub use shortcode::{InvalidShortCode, ShortCode};
pub use store::UrlStore;
