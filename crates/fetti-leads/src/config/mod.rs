use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::leads::capture::{NotificationSender, DEFAULT_FROM_ADDRESS};
use crate::leads::scoring::{ProductFocus, ScoringConfig, ScoringConfigError};

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

/// Top-level configuration for the lead service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
    pub notification: NotificationSender,
}

pub const DEFAULT_CAPTURED_CSV: &str = "captured_leads.csv";
pub const DEFAULT_MIN_CREDIT_SCORE: u16 = 640;

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

        let storage = StorageConfig {
            captured_csv: env::var("LEADS_CAPTURED_CSV")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_CAPTURED_CSV)),
            alias_table: env::var("LEADS_ALIAS_TABLE")
                .ok()
                .filter(|value| !value.trim().is_empty())
                .map(PathBuf::from),
        };

        let scoring = load_scoring()?;

        let from = env::var("FROM_EMAIL").unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string());
        let to = env::var("NOTIFY_EMAIL").unwrap_or_else(|_| from.clone());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            storage,
            scoring,
            notification: NotificationSender { from, to },
        })
    }
}

fn load_scoring() -> Result<ScoringConfig, ConfigError> {
    let product_focus = match env::var("LEADS_PRODUCT_FOCUS") {
        Ok(value) if !value.trim().is_empty() => value
            .parse::<ProductFocus>()
            .map_err(ConfigError::InvalidScoring)?,
        _ => ProductFocus::Any,
    };

    let target_states: Vec<String> = env::var("LEADS_TARGET_STATES")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|state| !state.is_empty())
        .map(str::to_string)
        .collect();

    let min_credit_score = match env::var("LEADS_MIN_CREDIT_SCORE") {
        Ok(value) => value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidNumber {
                key: "LEADS_MIN_CREDIT_SCORE",
                value,
            })?,
        Err(_) => DEFAULT_MIN_CREDIT_SCORE,
    };

    let min_liquid_assets = match env::var("LEADS_MIN_LIQUID_ASSETS") {
        Ok(value) => value
            .trim()
            .parse::<f64>()
            .map_err(|_| ConfigError::InvalidNumber {
                key: "LEADS_MIN_LIQUID_ASSETS",
                value,
            })?,
        Err(_) => 0.0,
    };

    ScoringConfig::new(
        product_focus,
        target_states,
        min_credit_score,
        min_liquid_assets,
    )
    .map_err(ConfigError::InvalidScoring)
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where captured leads are written and which alias table to normalize with.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub captured_csv: PathBuf,
    pub alias_table: Option<PathBuf>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str, value: String },
    InvalidScoring(ScoringConfigError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be numeric (got '{value}')")
            }
            ConfigError::InvalidScoring(err) => write!(f, "invalid scoring settings: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidScoring(err) => Some(err),
        }
    }
}
