use crate::error::Result;
use async_trait::async_trait;
use jiff::Timestamp;
use shortlink_core::{ShortCode, UrlRecord};

/// The outcome of resolving a short code.
///
/// A cache hit only knows the `short code -> original URL` mapping, so it
/// carries no `id` or `created_at`. Callers that need the full record must
/// handle both variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// Answered by the cache without touching the store.
    Cached {
        short_code: ShortCode,
        original_url: String,
    },
    /// Answered by the store.
    Stored(UrlRecord),
}

impl Resolved {
    pub fn short_code(&self) -> &ShortCode {
        match self {
            Resolved::Cached { short_code, .. } => short_code,
            Resolved::Stored(record) => &record.short_code,
        }
    }

    pub fn original_url(&self) -> &str {
        match self {
            Resolved::Cached { original_url, .. } => original_url,
            Resolved::Stored(record) => &record.original_url,
        }
    }

    /// The record id, known only when the store answered.
    pub fn id(&self) -> Option<i64> {
        match self {
            Resolved::Cached { .. } => None,
            Resolved::Stored(record) => Some(record.id),
        }
    }

    /// The creation time, known only when the store answered.
    pub fn created_at(&self) -> Option<Timestamp> {
        match self {
            Resolved::Cached { .. } => None,
            Resolved::Stored(record) => Some(record.created_at),
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Resolved::Cached { .. })
    }

    pub fn into_original_url(self) -> String {
        match self {
            Resolved::Cached { original_url, .. } => original_url,
            Resolved::Stored(record) => record.original_url,
        }
    }
}

/// Where a redirect should send the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget(String);

impl RedirectTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Resolved> for RedirectTarget {
    fn from(resolved: Resolved) -> Self {
        Self(resolved.into_original_url())
    }
}

/// The capability interface shared by the protocol adapters.
///
/// Adapters only translate requests and responses; every decision about
/// generation, storage, and caching lives behind this trait.
#[async_trait]
pub trait UrlResolver: Send + Sync + 'static {
    /// Creates a new short code for `original_url`.
    ///
    /// Every call creates a new record, even for a URL that was shortened
    /// before.
    async fn create(&self, original_url: &str) -> Result<UrlRecord>;

    /// Resolves a short code, consulting the cache first.
    async fn resolve_by_code(&self, code: &ShortCode) -> Result<Resolved>;

    /// Finds the short code of the earliest record for `original_url`.
    async fn resolve_code_by_url(&self, original_url: &str) -> Result<ShortCode>;

    /// Same lookup as [`resolve_by_code`](Self::resolve_by_code), returning
    /// only where to send the client.
    async fn redirect(&self, code: &ShortCode) -> Result<RedirectTarget> {
        self.resolve_by_code(code).await.map(RedirectTarget::from)
    }
}
