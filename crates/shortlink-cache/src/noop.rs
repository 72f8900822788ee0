use async_trait::async_trait;
use shortlink_core::cache::{Result, UrlCache};
use shortlink_core::ShortCode;
use tracing::debug;

/// A cache that stores nothing.
///
/// Every read misses and every write succeeds, so all lookups go to the
/// store. Used when caching is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NoopUrlCache;

impl NoopUrlCache {
    pub fn new() -> Self {
        debug!("Using NoopUrlCache (caching disabled)");
        Self
    }
}

impl Default for NoopUrlCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UrlCache for NoopUrlCache {
    async fn get(&self, _code: &ShortCode) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set(&self, _code: &ShortCode, _original_url: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_misses() {
        let cache = NoopUrlCache::new();
        let code = ShortCode::new("abc123").unwrap();

        cache.set(&code, "https://example.com").await.unwrap();
        assert!(cache.get(&code).await.unwrap().is_none());
    }
}
