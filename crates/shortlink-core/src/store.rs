use crate::error::StorageError;
use crate::record::{NewUrlRecord, UrlRecord};
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// The durable source of truth for URL records.
///
/// Lookups return `Ok(None)` when nothing matches; errors are reserved for
/// backend failures. Schema creation is an initialization concern of the
/// concrete store and never happens per request.
#[async_trait]
pub trait UrlStore: Send + Sync + 'static {
    /// Inserts a new record, assigning its `id` and `created_at`.
    ///
    /// Returns `Err(StorageError::Conflict)` if the short code is already
    /// taken. An existing record is never overwritten.
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord>;

    /// Looks a record up by its primary key.
    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>>;

    /// Looks a record up by its unique short code.
    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>>;

    /// Looks a record up by its original URL.
    ///
    /// Several records may share an original URL; implementations return
    /// the one with the lowest `id`.
    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>>;
}

#[async_trait]
impl<T: UrlStore + ?Sized> UrlStore for Arc<T> {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        (**self).insert(record).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>> {
        (**self).find_by_id(id).await
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        (**self).find_by_short_code(code).await
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        (**self).find_by_original_url(original_url).await
    }
}
