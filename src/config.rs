//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use secrecy::{ExposeSecret, SecretString};

/// Development default values - NEVER use in production.
pub mod defaults {
    pub const DEV_DATABASE_URL: &str = "postgres://rp:rp@localhost:5432/reportportal";
    pub const DEV_DB_MAX_CONNECTIONS: u32 = 10;
    pub const DEV_DB_MIN_CONNECTIONS: u32 = 1;

    // S3/MinIO defaults for development
    pub const DEV_S3_ENDPOINT: &str = "http://localhost:9100";
    pub const DEV_S3_BUCKET: &str = "attachments";
    pub const DEV_S3_REGION: &str = "us-east-1";
    pub const DEV_S3_ACCESS_KEY: &str = "minioadmin";
    pub const DEV_S3_SECRET_KEY: &str = "minioadmin";

    pub const DEV_ANALYZER_TIMEOUT_SECS: u64 = 10;
    pub const DEV_CLEAN_SCREENSHOTS_INTERVAL_SECS: u64 = 60; // 1 min dev
    pub const PROD_CLEAN_SCREENSHOTS_INTERVAL_SECS: u64 = 86_400; // daily in production
    pub const DEV_CLEAN_SCREENSHOTS_PAGE_SIZE: u64 = 50;
    pub const DEV_EVENT_CHANNEL_CAPACITY: usize = 1000;
}

/// Runtime environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// Parse environment from string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Check if this is a development environment.
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    /// Check if this is a production environment.
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// PostgreSQL connection string
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// S3 storage configuration for attachments.
#[derive(Debug, Clone)]
pub struct StorageSettings {
    /// S3 endpoint URL (for MinIO or custom S3-compatible services)
    pub endpoint: Option<String>,
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: SecretString,
}

/// Analyzer (search index) settings.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Base URL of the analyzer service. `None` disables index cleanup.
    pub url: Option<String>,
    pub timeout_secs: u64,
}

/// Scheduled job settings.
#[derive(Debug, Clone)]
pub struct JobSettings {
    /// How often the screenshot cleanup job runs
    pub clean_screenshots_interval_secs: u64,
    /// Projects fetched per page by the screenshot cleanup job
    pub clean_screenshots_page_size: u64,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Runtime environment
    pub environment: Environment,
    pub database: DatabaseSettings,
    pub storage: StorageSettings,
    pub analyzer: AnalyzerSettings,
    pub jobs: JobSettings,
    /// Capacity of the in-process domain event channel
    pub event_channel_capacity: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In development mode (RUST_ENV=development) every variable has a default.
    /// In production mode the server refuses development database URLs and
    /// S3 credentials.
    ///
    /// Environment variables:
    /// - `RUST_ENV`: Environment (development/production) - REQUIRED
    /// - `RP_DB_URL`: PostgreSQL connection string
    /// - `RP_DB_MAX_CONNECTIONS` / `RP_DB_MIN_CONNECTIONS`: pool bounds
    /// - `S3_ENDPOINT`, `S3_BUCKET`, `S3_REGION`, `S3_ACCESS_KEY`, `S3_SECRET_KEY`
    /// - `RP_ANALYZER_URL`: analyzer base URL (optional)
    /// - `RP_ANALYZER_TIMEOUT_SECS`: analyzer request timeout (default: 10)
    /// - `RP_CLEAN_SCREENSHOTS_INTERVAL_SECS`: screenshot cleanup period
    /// - `RP_CLEAN_SCREENSHOTS_PAGE_SIZE`: projects per page (default: 50)
    /// - `RP_EVENT_CHANNEL_CAPACITY`: event bus capacity (default: 1000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_str = env::var("RUST_ENV").map_err(|_| ConfigError::MissingEnvVar("RUST_ENV"))?;

        let environment = Environment::parse(&env_str).ok_or(ConfigError::InvalidValue(
            "RUST_ENV must be 'development' or 'production'",
        ))?;

        let database = DatabaseSettings {
            url: env::var("RP_DB_URL").unwrap_or_else(|_| defaults::DEV_DATABASE_URL.to_string()),
            max_connections: parse_var(
                "RP_DB_MAX_CONNECTIONS",
                defaults::DEV_DB_MAX_CONNECTIONS,
                "RP_DB_MAX_CONNECTIONS must be a valid number",
            )?,
            min_connections: parse_var(
                "RP_DB_MIN_CONNECTIONS",
                defaults::DEV_DB_MIN_CONNECTIONS,
                "RP_DB_MIN_CONNECTIONS must be a valid number",
            )?,
        };

        let storage = StorageSettings {
            endpoint: env::var("S3_ENDPOINT").ok().or_else(|| {
                if environment.is_development() {
                    Some(defaults::DEV_S3_ENDPOINT.to_string())
                } else {
                    None
                }
            }),
            bucket: env::var("S3_BUCKET").unwrap_or_else(|_| defaults::DEV_S3_BUCKET.to_string()),
            region: env::var("S3_REGION").unwrap_or_else(|_| defaults::DEV_S3_REGION.to_string()),
            access_key: env::var("S3_ACCESS_KEY")
                .unwrap_or_else(|_| defaults::DEV_S3_ACCESS_KEY.to_string()),
            secret_key: SecretString::from(
                env::var("S3_SECRET_KEY")
                    .unwrap_or_else(|_| defaults::DEV_S3_SECRET_KEY.to_string()),
            ),
        };

        let analyzer = AnalyzerSettings {
            url: env::var("RP_ANALYZER_URL")
                .ok()
                .filter(|url| !url.trim().is_empty()),
            timeout_secs: parse_var(
                "RP_ANALYZER_TIMEOUT_SECS",
                defaults::DEV_ANALYZER_TIMEOUT_SECS,
                "RP_ANALYZER_TIMEOUT_SECS must be a valid number",
            )?,
        };

        let default_interval = if environment.is_development() {
            defaults::DEV_CLEAN_SCREENSHOTS_INTERVAL_SECS
        } else {
            defaults::PROD_CLEAN_SCREENSHOTS_INTERVAL_SECS
        };

        let jobs = JobSettings {
            clean_screenshots_interval_secs: parse_var(
                "RP_CLEAN_SCREENSHOTS_INTERVAL_SECS",
                default_interval,
                "RP_CLEAN_SCREENSHOTS_INTERVAL_SECS must be a valid number",
            )?,
            clean_screenshots_page_size: parse_var(
                "RP_CLEAN_SCREENSHOTS_PAGE_SIZE",
                defaults::DEV_CLEAN_SCREENSHOTS_PAGE_SIZE,
                "RP_CLEAN_SCREENSHOTS_PAGE_SIZE must be a valid number",
            )?,
        };

        let event_channel_capacity = parse_var(
            "RP_EVENT_CHANNEL_CAPACITY",
            defaults::DEV_EVENT_CHANNEL_CAPACITY,
            "RP_EVENT_CHANNEL_CAPACITY must be a valid number",
        )?;

        let config = Config {
            environment,
            database,
            storage,
            analyzer,
            jobs,
            event_channel_capacity,
        };

        config.validate()?;

        // Validate production configuration
        if environment.is_production() {
            config.validate_production()?;
        }

        Ok(config)
    }

    /// Validate values that are wrong in every environment.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "RP_DB_MIN_CONNECTIONS must not exceed RP_DB_MAX_CONNECTIONS",
            ));
        }
        if self.jobs.clean_screenshots_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "RP_CLEAN_SCREENSHOTS_INTERVAL_SECS must be greater than zero",
            ));
        }
        if self.jobs.clean_screenshots_page_size == 0 {
            return Err(ConfigError::InvalidValue(
                "RP_CLEAN_SCREENSHOTS_PAGE_SIZE must be greater than zero",
            ));
        }
        if self.event_channel_capacity == 0 {
            return Err(ConfigError::InvalidValue(
                "RP_EVENT_CHANNEL_CAPACITY must be greater than zero",
            ));
        }
        Ok(())
    }

    /// Validate that production configuration does not use development defaults.
    fn validate_production(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.database.url == defaults::DEV_DATABASE_URL {
            errors.push(format!(
                "RP_DB_URL is using development default '{}'. Set a production PostgreSQL URL.",
                defaults::DEV_DATABASE_URL
            ));
        }

        // Check if using dev S3 credentials in production
        if self.storage.access_key == defaults::DEV_S3_ACCESS_KEY
            || self.storage.secret_key.expose_secret() == defaults::DEV_S3_SECRET_KEY
        {
            errors.push(
                "S3_ACCESS_KEY/S3_SECRET_KEY are using development defaults. Set production S3 credentials."
                    .to_string(),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigError::ProductionValidation(errors));
        }

        Ok(())
    }

    /// Check if running in development mode.
    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }
}

fn parse_var<T: FromStr + ToString>(
    name: &str,
    default: T,
    message: &'static str,
) -> Result<T, ConfigError> {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(message))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(&'static str),

    #[error("Production configuration validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    ProductionValidation(Vec<String>),
}
