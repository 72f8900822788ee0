use async_trait::async_trait;
use moka::future::Cache;
use shortlink_core::cache::{Result, UrlCache};
use shortlink_core::ShortCode;
use tracing::{debug, trace};

const DEFAULT_MAX_CAPACITY: u64 = 10_000;

/// An in-process cache implementation using Moka.
///
/// Entries never expire; the capacity bound only evicts the least useful
/// entries once it is reached. Suited to single-node deployments.
#[derive(Debug, Clone)]
pub struct MokaUrlCache {
    cache: Cache<ShortCode, String>,
}

impl MokaUrlCache {
    /// Creates a cache holding at most 10,000 entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_CAPACITY)
    }

    /// Creates a cache with a custom maximum number of entries.
    pub fn with_capacity(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }
}

impl Default for MokaUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for MokaUrlCache {
    async fn get(&self, code: &ShortCode) -> Result<Option<String>> {
        match self.cache.get(code).await {
            Some(url) => {
                debug!(code = %code, "Cache hit in Moka");
                Ok(Some(url))
            }
            None => {
                trace!(code = %code, "Cache miss in Moka");
                Ok(None)
            }
        }
    }

    async fn set(&self, code: &ShortCode, original_url: &str) -> Result<()> {
        trace!(code = %code, "Storing URL in Moka cache");
        self.cache
            .insert(code.clone(), original_url.to_string())
            .await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> ShortCode {
        ShortCode::new(s).unwrap()
    }

    #[tokio::test]
    async fn get_returns_none_on_miss() {
        let cache = MokaUrlCache::new();
        assert!(cache.get(&code("abc123")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_then_get() {
        let cache = MokaUrlCache::new();
        cache
            .set(&code("abc123"), "https://example.com")
            .await
            .unwrap();

        let value = cache.get(&code("abc123")).await.unwrap();
        assert_eq!(value.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn set_overwrites_previous_value() {
        let cache = MokaUrlCache::new();
        cache.set(&code("abc123"), "https://old.example").await.unwrap();
        cache.set(&code("abc123"), "https://new.example").await.unwrap();

        let value = cache.get(&code("abc123")).await.unwrap();
        assert_eq!(value.as_deref(), Some("https://new.example"));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = MokaUrlCache::new();
        let other = cache.clone();

        cache.set(&code("abc123"), "https://example.com").await.unwrap();
        assert!(other.get(&code("abc123")).await.unwrap().is_some());
    }
}
