use crate::error::{CreationError, Result, ServiceError};
use crate::resolver::{Resolved, UrlResolver};
use async_trait::async_trait;
use shortlink_core::{NewUrlRecord, ShortCode, StorageError, UrlCache, UrlRecord, UrlStore};
use shortlink_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace, warn};
use typed_builder::TypedBuilder;

/// Tunables for [`ResolutionService`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct ServiceSettings {
    /// How many generated codes `create` tries before giving up on store
    /// conflicts. `1` means a conflict fails the create immediately.
    #[builder(default = 1)]
    pub create_attempts: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// The URL resolution service.
///
/// Holds no mutable state of its own: everything lives in the store and
/// the cache, which are shared, long-lived handles. Any number of requests
/// may run its operations concurrently.
///
/// Consistency rules:
/// - the store is the source of truth and is written first on create
/// - the cache is populated after every successful create or store read
/// - cache failures are logged and never fail an operation
pub struct ResolutionService<S, C, G> {
    store: Arc<S>,
    cache: Arc<C>,
    generator: Arc<G>,
    settings: ServiceSettings,
}

impl<S, C, G> Clone for ResolutionService<S, C, G> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            cache: Arc::clone(&self.cache),
            generator: Arc::clone(&self.generator),
            settings: self.settings,
        }
    }
}

impl<S: UrlStore, C: UrlCache, G: Generator> ResolutionService<S, C, G> {
    /// Creates a service with default settings.
    pub fn new(store: S, cache: C, generator: G) -> Self {
        Self::with_settings(store, cache, generator, ServiceSettings::default())
    }

    pub fn with_settings(store: S, cache: C, generator: G, settings: ServiceSettings) -> Self {
        Self {
            store: Arc::new(store),
            cache: Arc::new(cache),
            generator: Arc::new(generator),
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Validates that the URL has a valid format (http or https scheme and a host).
    fn validate_url(url: &str) -> Result<()> {
        if url.is_empty() {
            return Err(ServiceError::InvalidUrl("URL cannot be empty".to_string()));
        }

        let Some((scheme, rest)) = url.split_once("://") else {
            return Err(ServiceError::InvalidUrl(format!(
                "URL must have a scheme and host: {url}"
            )));
        };

        let scheme = scheme.to_ascii_lowercase();
        if scheme != "http" && scheme != "https" {
            return Err(ServiceError::InvalidUrl(format!(
                "URL scheme must be http or https: {scheme}"
            )));
        }

        let host = rest.split(['/', '?', '#']).next().unwrap_or_default();
        if host.is_empty() {
            return Err(ServiceError::InvalidUrl(format!(
                "URL must have a valid host: {url}"
            )));
        }

        // The URL is sent back verbatim as a `Location` header.
        if url.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ServiceError::InvalidUrl(format!(
                "URL must not contain whitespace or control characters: {url:?}"
            )));
        }

        Ok(())
    }

    /// Reads the cache, treating a cache failure as a miss.
    async fn cached_url(&self, code: &ShortCode) -> Option<String> {
        match self.cache.get(code).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(code = %code, error = %e, "Cache read failed, falling back to store");
                None
            }
        }
    }

    /// Best-effort cache write.
    async fn populate_cache(&self, code: &ShortCode, original_url: &str) {
        if let Err(e) = self.cache.set(code, original_url).await {
            warn!(code = %code, error = %e, "Cache write failed, store remains authoritative");
        }
    }

    async fn insert_with_fresh_code(&self, original_url: &str) -> Result<UrlRecord> {
        let attempts = self.settings.create_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            let code = self.generator.generate().map_err(CreationError::from)?;
            trace!(code = %code, attempt, "Generated short code");

            match self
                .store
                .insert(NewUrlRecord::new(code, original_url))
                .await
            {
                Ok(record) => return Ok(record),
                Err(StorageError::Conflict(code)) if attempt < attempts => {
                    warn!(code = %code, attempt, "Generated short code already taken, retrying");
                }
                Err(StorageError::Conflict(code)) => {
                    return Err(CreationError::Conflict(code).into());
                }
                Err(e) => return Err(CreationError::Storage(e).into()),
            }
        }
    }
}

#[async_trait]
impl<S: UrlStore, C: UrlCache, G: Generator> UrlResolver for ResolutionService<S, C, G> {
    async fn create(&self, original_url: &str) -> Result<UrlRecord> {
        Self::validate_url(original_url)?;

        let record = self.insert_with_fresh_code(original_url).await?;
        self.populate_cache(&record.short_code, &record.original_url)
            .await;

        debug!(id = record.id, code = %record.short_code, "Created short url");
        Ok(record)
    }

    async fn resolve_by_code(&self, code: &ShortCode) -> Result<Resolved> {
        if let Some(original_url) = self.cached_url(code).await {
            debug!(code = %code, "Resolved short code from cache");
            return Ok(Resolved::Cached {
                short_code: code.clone(),
                original_url,
            });
        }

        trace!(code = %code, "Cache miss, reading store");
        match self.store.find_by_short_code(code).await {
            Ok(Some(record)) => {
                self.populate_cache(code, &record.original_url).await;
                debug!(code = %code, id = record.id, "Resolved short code from store");
                Ok(Resolved::Stored(record))
            }
            Ok(None) => {
                trace!(code = %code, "Short code not found");
                Err(ServiceError::NotFound(code.to_string()))
            }
            Err(e) => Err(ServiceError::ResolutionFailed(e)),
        }
    }

    async fn resolve_code_by_url(&self, original_url: &str) -> Result<ShortCode> {
        match self.store.find_by_original_url(original_url).await {
            Ok(Some(record)) => Ok(record.short_code),
            Ok(None) => Err(ServiceError::NotFound(original_url.to_string())),
            Err(e) => Err(ServiceError::ResolutionFailed(e)),
        }
    }
}
