use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use chrono::{FixedOffset, Offset, Utc};

use crate::marketplace::location::DEFAULT_LOCALITY_RADIUS_KM;

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
    pub marketplace: MarketplaceConfig,
}

const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

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

        let utc_offset_minutes = match env::var("SATHI_UTC_OFFSET_MINUTES") {
            Ok(raw) => raw
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|minutes| minutes.abs() <= MAX_UTC_OFFSET_MINUTES)
                .ok_or(ConfigError::InvalidUtcOffset { value: raw })?,
            Err(_) => DEFAULT_UTC_OFFSET_MINUTES,
        };

        let locality_radius_km = match env::var("SATHI_LOCALITY_RADIUS_KM") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|radius| radius.is_finite() && *radius > 0.0)
                .ok_or(ConfigError::InvalidLocalityRadius { value: raw })?,
            Err(_) => DEFAULT_LOCALITY_RADIUS_KM,
        };

        let tags_api_key = env::var("SATHI_TAGS_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            marketplace: MarketplaceConfig {
                utc_offset_minutes,
                locality_radius_km,
                tags_api_key,
            },
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

/// Marketplace knobs: local time zone for schedules, locality radius and tag suggester credential.
#[derive(Clone)]
pub struct MarketplaceConfig {
    pub utc_offset_minutes: i32,
    pub locality_radius_km: f64,
    pub tags_api_key: Option<String>,
}

impl MarketplaceConfig {
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).unwrap_or_else(|| Utc.fix())
    }
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: DEFAULT_UTC_OFFSET_MINUTES,
            locality_radius_km: DEFAULT_LOCALITY_RADIUS_KM,
            tags_api_key: None,
        }
    }
}

impl fmt::Debug for MarketplaceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketplaceConfig")
            .field("utc_offset_minutes", &self.utc_offset_minutes)
            .field("locality_radius_km", &self.locality_radius_km)
            .field(
                "tags_api_key",
                &self.tags_api_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidUtcOffset { value: String },
    InvalidLocalityRadius { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidUtcOffset { value } => write!(
                f,
                "SATHI_UTC_OFFSET_MINUTES must be an integer within +/-840, got '{value}'"
            ),
            ConfigError::InvalidLocalityRadius { value } => write!(
                f,
                "SATHI_LOCALITY_RADIUS_KM must be a positive number, got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidUtcOffset { .. }
            | ConfigError::InvalidLocalityRadius { .. } => None,
        }
    }
}
