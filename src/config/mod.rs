use chrono::NaiveTime;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub database: DatabaseConfig,
    pub mail: MailConfig,
    pub push: PushConfig,
    pub report: ReportConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            database: DatabaseConfig::from_env()?,
            mail: MailConfig::from_env(),
            push: PushConfig::from_env(),
            report: ReportConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Connection settings for the shared MySQL pool.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => url,
            _ => compose_database_url()?,
        };

        Ok(Self {
            url,
            max_connections: parse_env_or("DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_env_or("DB_MIN_CONNECTIONS", 2)?,
            acquire_timeout: Duration::from_secs(parse_env_or("DB_ACQUIRE_TIMEOUT_SECS", 60)?),
        })
    }
}

fn compose_database_url() -> Result<String, ConfigError> {
    let host = env::var("DB_HOST").map_err(|_| ConfigError::MissingDatabaseUrl)?;
    let user = env::var("DB_USER").unwrap_or_else(|_| "root".to_string());
    let password = env::var("DB_PASSWORD").unwrap_or_default();
    let port = env::var("DB_PORT").unwrap_or_else(|_| "3306".to_string());
    let name = env::var("DB_NAME").map_err(|_| ConfigError::MissingDatabaseUrl)?;

    Ok(format!("mysql://{user}:{password}@{host}:{port}/{name}"))
}

/// Transactional mail API used for the daily owner report.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub from: String,
}

impl MailConfig {
    fn from_env() -> Self {
        Self {
            api_url: non_empty_env("MAIL_API_URL"),
            api_key: non_empty_env("MAIL_API_KEY"),
            from: env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Hostel Management System <reports@localhost>".to_string()),
        }
    }
}

/// Expo push endpoint settings.
#[derive(Debug, Clone)]
pub struct PushConfig {
    pub endpoint: String,
    pub access_token: Option<String>,
}

impl PushConfig {
    pub const DEFAULT_ENDPOINT: &'static str = "https://exp.host/--/api/v2/push/send";

    fn from_env() -> Self {
        Self {
            endpoint: non_empty_env("EXPO_PUSH_URL")
                .unwrap_or_else(|| Self::DEFAULT_ENDPOINT.to_string()),
            access_token: non_empty_env("EXPO_ACCESS_TOKEN"),
        }
    }
}

/// When and whether the daily report fires.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub run_at: NaiveTime,
    pub scheduler_enabled: bool,
}

impl ReportConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw_time = env::var("REPORT_TIME").unwrap_or_else(|_| "23:59".to_string());
        let run_at = NaiveTime::parse_from_str(raw_time.trim(), "%H:%M")
            .map_err(|_| ConfigError::InvalidReportTime(raw_time.clone()))?;

        let scheduler_enabled = match env::var("REPORT_SCHEDULER_ENABLED") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                name: "REPORT_SCHEDULER_ENABLED",
                value,
            })?,
            Err(_) => true,
        };

        Ok(Self {
            run_at,
            scheduler_enabled,
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_env_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingDatabaseUrl,
    InvalidNumber { name: &'static str, value: String },
    InvalidReportTime(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingDatabaseUrl => write!(
                f,
                "DATABASE_URL is not set and DB_HOST/DB_NAME are not available to build it"
            ),
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a non-negative integer, got '{value}'")
            }
            ConfigError::InvalidReportTime(value) => {
                write!(f, "REPORT_TIME must be HH:MM, got '{value}'")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
