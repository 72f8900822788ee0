use crate::error::CacheError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;
use std::sync::Arc;

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

/// A `short code -> original URL` cache.
///
/// The cache is a derived view of the store: losing it loses performance,
/// never data. Entries carry no expiration.
#[async_trait]
pub trait UrlCache: Send + Sync + 'static {
    /// Returns the cached original URL, or `Ok(None)` on a miss.
    async fn get(&self, code: &ShortCode) -> Result<Option<String>>;

    /// Stores the original URL for a short code, replacing any previous value.
    async fn set(&self, code: &ShortCode, original_url: &str) -> Result<()>;
}

#[async_trait]
impl<T: UrlCache + ?Sized> UrlCache for Arc<T> {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        (**self).get(code).await
    }

    async fn set(&self, code: &ShortCode, original_url: &str) -> Result<()> {
        (**self).set(code, original_url).await
    }
}
