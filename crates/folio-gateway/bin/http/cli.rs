use clap::builder::TypedValueParser;
use clap::{Parser, ValueEnum};
use folio_core::shortcode::DEFAULT_CODE_LENGTH;
use folio_core::Retention;
use folio_shortener::DEFAULT_MAX_ATTEMPTS;
use folio_telemetry::LogFormat;
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "FOLIO_LISTEN_ADDR";
pub const PUBLIC_BASE_URL_ENV: &str = "FOLIO_PUBLIC_BASE_URL";
pub const STORAGE_BACKEND_ENV: &str = "FOLIO_STORAGE_BACKEND";
pub const DATABASE_URL_ENV: &str = "FOLIO_DATABASE_URL";
pub const RETENTION_DAYS_ENV: &str = "FOLIO_RETENTION_DAYS";
pub const CODE_LENGTH_ENV: &str = "FOLIO_CODE_LENGTH";
pub const MAX_ATTEMPTS_ENV: &str = "FOLIO_MAX_ATTEMPTS";
pub const STORE_TIMEOUT_MS_ENV: &str = "FOLIO_STORE_TIMEOUT_MS";
pub const CONNECT_ATTEMPTS_ENV: &str = "FOLIO_CONNECT_ATTEMPTS";
pub const PURGE_INTERVAL_SECS_ENV: &str = "FOLIO_PURGE_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "FOLIO_LOG_FORMAT";
pub const OTLP_ENDPOINT_ENV: &str = "FOLIO_OTLP_ENDPOINT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Text => LogFormat::Text,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "folio-gateway")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    /// Base address short URLs are composed on.
    #[arg(long, env = PUBLIC_BASE_URL_ENV, default_value = DEFAULT_PUBLIC_BASE_URL)]
    pub public_base_url: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::Mysql
    )]
    pub storage: StorageBackendArg,

    /// Connection URL of the mapping store (`mysql://...` or `redis://...`).
    #[arg(
        long,
        env = DATABASE_URL_ENV,
        required_if_eq_any([("storage", "mysql"), ("storage", "redis")])
    )]
    pub database_url: Option<String>,

    #[arg(long, env = RETENTION_DAYS_ENV, default_value_t = Retention::DEFAULT_DAYS)]
    pub retention_days: u32,

    #[arg(
        long,
        env = CODE_LENGTH_ENV,
        default_value_t = DEFAULT_CODE_LENGTH,
        value_parser = clap::value_parser!(u8).range(1..=32).map(usize::from)
    )]
    pub code_length: usize,

    #[arg(long, env = MAX_ATTEMPTS_ENV, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    #[arg(long, env = STORE_TIMEOUT_MS_ENV, default_value_t = 5_000)]
    pub store_timeout_ms: u64,

    #[arg(long, env = CONNECT_ATTEMPTS_ENV, default_value_t = 3)]
    pub connect_attempts: u32,

    /// Seconds between expired-record sweeps; 0 disables sweeping.
    #[arg(long, env = PURGE_INTERVAL_SECS_ENV, default_value_t = 60)]
    pub purge_interval_secs: u64,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,

    #[arg(long, env = OTLP_ENDPOINT_ENV)]
    pub otlp_endpoint: Option<String>,
}
