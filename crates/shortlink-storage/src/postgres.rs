use async_trait::async_trait;
use jiff::Timestamp;
use shortlink_core::store::{Result, UrlStore};
use shortlink_core::{NewUrlRecord, ShortCode, StorageError, UrlRecord};
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::{debug, info};

// `created_at` is read back as microseconds since the Unix epoch.
const INSERT_RECORD: &str = r#"
    INSERT INTO urls (original_url, short_code)
    VALUES ($1, $2)
    RETURNING id, original_url, short_code,
              (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_us
"#;

const SELECT_BY_ID: &str = r#"
    SELECT id, original_url, short_code,
           (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_us
    FROM urls
    WHERE id = $1
"#;

const SELECT_BY_SHORT_CODE: &str = r#"
    SELECT id, original_url, short_code,
           (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_us
    FROM urls
    WHERE short_code = $1
"#;

const SELECT_BY_ORIGINAL_URL: &str = r#"
    SELECT id, original_url, short_code,
           (EXTRACT(EPOCH FROM created_at) * 1000000)::BIGINT AS created_at_us
    FROM urls
    WHERE original_url = $1
    ORDER BY id ASC
    LIMIT 1
"#;

/// PostgreSQL implementation of the store contract.
///
/// Records live in the `urls` table. The unique constraint on `short_code`
/// turns colliding inserts into [`StorageError::Conflict`] instead of
/// overwriting anything.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a store from an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a store by opening a new connection pool.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations.
    ///
    /// Run once at startup, never per request.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration(e.to_string()))?;
        info!("Database schema is up to date");
        Ok(())
    }

    async fn fetch_optional(&self, query: PgQuery<'_>) -> Result<Option<UrlRecord>> {
        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        row.as_ref().map(record_from_row).transpose()
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

fn record_from_row(row: &PgRow) -> Result<UrlRecord> {
    let id: i64 = row.try_get("id").map_err(map_sqlx_error)?;
    let original_url: String = row.try_get("original_url").map_err(map_sqlx_error)?;
    let short_code: String = row.try_get("short_code").map_err(map_sqlx_error)?;
    let created_at_us: i64 = row.try_get("created_at_us").map_err(map_sqlx_error)?;

    let short_code = ShortCode::new(&short_code)
        .map_err(|e| StorageError::InvalidData(format!("record {id}: {e}")))?;
    let created_at = Timestamp::from_microsecond(created_at_us).map_err(|e| {
        StorageError::InvalidData(format!(
            "invalid created_at timestamp '{created_at_us}' for record {id}: {e}"
        ))
    })?;

    Ok(UrlRecord {
        id,
        original_url,
        short_code,
        created_at,
    })
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl UrlStore for PostgresStore {
    async fn insert(&self, record: NewUrlRecord) -> Result<UrlRecord> {
        let result = sqlx::query(INSERT_RECORD)
            .bind(record.original_url.as_str())
            .bind(record.short_code.as_str())
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => {
                let stored = record_from_row(&row)?;
                debug!(id = stored.id, code = %stored.short_code, "Inserted record");
                Ok(stored)
            }
            Err(err) if is_unique_violation(&err) => {
                Err(StorageError::Conflict(record.short_code.to_string()))
            }
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UrlRecord>> {
        self.fetch_optional(sqlx::query(SELECT_BY_ID).bind(id))
            .await
    }

    async fn find_by_short_code(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        self.fetch_optional(sqlx::query(SELECT_BY_SHORT_CODE).bind(code.as_str()))
            .await
    }

    async fn find_by_original_url(&self, original_url: &str) -> Result<Option<UrlRecord>> {
        self.fetch_optional(sqlx::query(SELECT_BY_ORIGINAL_URL).bind(original_url))
            .await
    }
}
