use crate::v1::Url;
use shortlink_core::UrlRecord;

impl From<UrlRecord> for Url {
    fn from(record: UrlRecord) -> Self {
        Url {
            id: Some(record.id),
            short_url: record.short_code.to_string(),
            created_at: Some(record.created_at.to_string()),
            original_url: record.original_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::v1::Url;
    use jiff::Timestamp;
    use shortlink_core::{NewUrlRecord, ShortCode};

    #[test]
    fn record_converts_with_rfc3339_timestamp() {
        let created_at: Timestamp = "2026-03-01T12:30:00Z".parse().unwrap();
        let record = NewUrlRecord::new(ShortCode::new("abC12").unwrap(), "https://example.com")
            .into_record(42, created_at);

        let url = Url::from(record);

        assert_eq!(url.id, Some(42));
        assert_eq!(url.short_url, "abC12");
        assert_eq!(url.original_url, "https://example.com");
        assert_eq!(url.created_at.as_deref(), Some("2026-03-01T12:30:00Z"));
    }
}
