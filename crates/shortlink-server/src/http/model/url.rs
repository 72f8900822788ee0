use serde::{Deserialize, Serialize};
use shortlink_core::UrlRecord;
use shortlink_service::Resolved;

#[derive(Deserialize)]
pub struct CreateUrlRequest {
    pub original_url: String,
}

#[derive(Deserialize)]
pub struct ShortUrlQuery {
    pub original_url: Option<String>,
}

/// JSON form of a URL record.
///
/// `id` and `created_at` are omitted when the lookup was answered by the
/// cache.
#[derive(Debug, Serialize)]
pub struct UrlResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub original_url: String,
    pub short_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<UrlRecord> for UrlResponse {
    fn from(record: UrlRecord) -> Self {
        Self {
            id: Some(record.id),
            short_url: record.short_code.to_string(),
            created_at: Some(record.created_at.to_string()),
            original_url: record.original_url,
        }
    }
}

impl From<Resolved> for UrlResponse {
    fn from(resolved: Resolved) -> Self {
        match resolved {
            Resolved::Stored(record) => record.into(),
            Resolved::Cached {
                short_code,
                original_url,
            } => Self {
                id: None,
                original_url,
                short_url: short_code.to_string(),
                created_at: None,
            },
        }
    }
}

#[derive(Serialize)]
pub struct ShortUrlResponse {
    pub short_url: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
