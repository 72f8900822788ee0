use clap::{Parser, ValueEnum};
use shortlink_server::telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const GRPC_LISTEN_ADDR_ENV: &str = "SHORTLINK_GRPC_LISTEN_ADDR";
pub const HTTP_LISTEN_ADDR_ENV: &str = "SHORTLINK_HTTP_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "SHORTLINK_STORAGE_BACKEND";
pub const DATABASE_DSN_ENV: &str = "SHORTLINK_DATABASE_DSN";
pub const DATABASE_MAX_CONNECTIONS_ENV: &str = "SHORTLINK_DATABASE_MAX_CONNECTIONS";
pub const CACHE_BACKEND_ENV: &str = "SHORTLINK_CACHE_BACKEND";
pub const REDIS_URL_ENV: &str = "SHORTLINK_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "SHORTLINK_REDIS_KEY_PREFIX";
pub const WORKER_ID_ENV: &str = "SHORTLINK_WORKER_ID";
pub const CREATE_ATTEMPTS_ENV: &str = "SHORTLINK_CREATE_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "SHORTLINK_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "SHORTLINK_OTLP_ENDPOINT";

pub const DEFAULT_GRPC_LISTEN_ADDR: &str = "127.0.0.1:50051";
pub const DEFAULT_HTTP_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "postgres")]
    Postgres,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Postgres => write!(f, "postgres"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CacheBackendArg {
    #[value(name = "none")]
    None,
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for CacheBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheBackendArg::None => write!(f, "none"),
            CacheBackendArg::InMemory => write!(f, "in-memory"),
            CacheBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "shortlink-server")]
pub struct CLI {
    #[arg(long, env = GRPC_LISTEN_ADDR_ENV, default_value = DEFAULT_GRPC_LISTEN_ADDR)]
    pub grpc_listen_addr: SocketAddr,

    #[arg(long, env = HTTP_LISTEN_ADDR_ENV, default_value = DEFAULT_HTTP_LISTEN_ADDR)]
    pub http_listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = DATABASE_DSN_ENV, required_if_eq("storage", "postgres"))]
    pub database_dsn: Option<String>,

    #[arg(long, env = DATABASE_MAX_CONNECTIONS_ENV, default_value_t = 10)]
    pub database_max_connections: u32,

    #[arg(
        long,
        env = CACHE_BACKEND_ENV,
        value_enum,
        default_value_t = CacheBackendArg::InMemory
    )]
    pub cache: CacheBackendArg,

    #[arg(long, env = REDIS_URL_ENV, default_value = DEFAULT_REDIS_URL)]
    pub redis_url: String,

    #[arg(
        long,
        env = REDIS_KEY_PREFIX_ENV,
        default_value = shortlink_cache::redis::DEFAULT_KEY_PREFIX
    )]
    pub redis_key_prefix: String,

    #[arg(long, env = WORKER_ID_ENV, default_value_t = 0)]
    pub worker_id: u8,

    #[arg(
        long,
        env = CREATE_ATTEMPTS_ENV,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub create_attempts: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value = "text")]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cli = CLI::try_parse_from(["shortlink-server"]).unwrap();

        assert_eq!(cli.grpc_listen_addr.to_string(), "127.0.0.1:50051");
        assert_eq!(cli.http_listen_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cli.storage, StorageBackendArg::InMemory);
        assert_eq!(cli.cache, CacheBackendArg::InMemory);
        assert_eq!(cli.redis_key_prefix, "shortlink:url:");
        assert_eq!(cli.create_attempts, 1);
        assert_eq!(cli.log_format, LogFormatArg::Text);
        assert!(cli.otlp_endpoint.is_none());
    }

    #[test]
    fn postgres_requires_dsn() {
        let result = CLI::try_parse_from(["shortlink-server", "--storage", "postgres"]);
        assert!(result.is_err());

        let cli = CLI::try_parse_from([
            "shortlink-server",
            "--storage",
            "postgres",
            "--database-dsn",
            "postgres://localhost/shortlink",
        ])
        .unwrap();
        assert_eq!(cli.storage, StorageBackendArg::Postgres);
    }

    #[test]
    fn zero_create_attempts_is_rejected() {
        let result = CLI::try_parse_from(["shortlink-server", "--create-attempts", "0"]);
        assert!(result.is_err());
    }
}
