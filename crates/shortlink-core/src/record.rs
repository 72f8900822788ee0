use crate::shortcode::ShortCode;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A URL record as persisted by the store.
///
/// Records are created once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlRecord {
    /// Store-assigned identifier, never reused.
    pub id: i64,
    /// The long-form URL that was shortened. Not unique.
    pub original_url: String,
    /// The generated short code. Unique across all records.
    pub short_code: ShortCode,
    /// When the record was inserted.
    pub created_at: Timestamp,
}

/// The caller-supplied part of a [`UrlRecord`], before the store assigns
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUrlRecord {
    pub original_url: String,
    pub short_code: ShortCode,
}

impl NewUrlRecord {
    pub fn new(short_code: ShortCode, original_url: impl Into<String>) -> Self {
        Self {
            original_url: original_url.into(),
            short_code,
        }
    }

    /// Completes the record with the values assigned by the store.
    pub fn into_record(self, id: i64, created_at: Timestamp) -> UrlRecord {
        UrlRecord {
            id,
            original_url: self.original_url,
            short_code: self.short_code,
            created_at,
        }
    }
}
