//! Configuration infrastructure
//!
//! Settings are layered in three tiers:
//! 1. Built-in defaults (see [`defaults`])
//! 2. An optional config file (TOML, JSON or YAML)
//! 3. Environment variables prefixed with `GALLERY_SCRAPER`, e.g.
//!    `GALLERY_SCRAPER__SCRAPER__BASE_DIR=out`

#![allow(clippy::uninlined_format_args)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Catalog and output locations
    pub scraper: ScraperConfig,

    /// HTTP client behaviour
    pub http: HttpClientConfig,

    /// Politeness delay between image downloads
    pub throttle: ThrottleConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Catalog and output locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// CSV catalog with `data-image-key`, `URL`, `levels` and optional `regex` columns
    pub catalog_path: PathBuf,

    /// Root directory under which `<key>/<key>_<level>/` folders are created
    pub base_dir: PathBuf,
}

/// HTTP client configuration for gallery and image requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Browser identity sent with gallery page requests only
    pub user_agent: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Whether to follow redirects
    pub follow_redirects: bool,
}

/// How the pause after each download attempt is produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThrottleStrategy {
    /// Sleep `delay_ms` after every attempt
    Fixed,
    /// Token bucket allowing `requests_per_second` attempts
    TokenBucket,
    /// No pause at all
    None,
}

/// Throttle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrottleConfig {
    pub strategy: ThrottleStrategy,

    /// Delay for the `fixed` strategy, in milliseconds
    pub delay_ms: u64,

    /// Rate for the `token_bucket` strategy
    pub requests_per_second: u32,
}

impl ThrottleConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the rolling log file
    pub log_dir: PathBuf,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: HashMap<String, String>,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(defaults::CATALOG_PATH),
            base_dir: PathBuf::from(defaults::BASE_DIR),
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            follow_redirects: true,
        }
    }
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            strategy: ThrottleStrategy::Fixed,
            delay_ms: defaults::DOWNLOAD_DELAY_MS,
            requests_per_second: defaults::REQUESTS_PER_SECOND,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "info".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters.insert("selectors".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional file and the environment
    ///
    /// An explicitly given file must exist; otherwise `wiki-gallery-scraper.{toml,json,yaml}`
    /// in the working directory is used when present.
    pub fn load(config_file: Option<&Path>) -> ScrapeResult<Self> {
        let file_source = match config_file {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(defaults::CONFIG_FILE_STEM).required(false),
        };

        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?)
            .add_source(file_source)
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make the run meaningless
    pub fn validate(&self) -> ScrapeResult<()> {
        if self.http.timeout_seconds == 0 {
            return Err(ScrapeError::invalid_config(
                "http.timeout_seconds must be greater than 0",
            ));
        }

        if self.http.user_agent.trim().is_empty() {
            return Err(ScrapeError::invalid_config("http.user_agent must not be empty"));
        }

        if self.throttle.strategy == ThrottleStrategy::TokenBucket
            && self.throttle.requests_per_second == 0
        {
            return Err(ScrapeError::invalid_config(
                "throttle.requests_per_second must be greater than 0 for token_bucket",
            ));
        }

        if !self.logging.console_output && !self.logging.file_output {
            return Err(ScrapeError::invalid_config("No logging output configured"));
        }

        Ok(())
    }
}

/// Default configuration values
pub mod defaults {
    /// Config file looked up in the working directory (extension optional)
    pub const CONFIG_FILE_STEM: &str = "wiki-gallery-scraper";

    /// Environment variable prefix
    pub const ENV_PREFIX: &str = "GALLERY_SCRAPER";

    /// Default catalog location
    pub const CATALOG_PATH: &str = "catalog.csv";

    /// Default output root
    pub const BASE_DIR: &str = "items";

    /// Browser identity for gallery page requests
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;

    /// Default pause after each download attempt
    pub const DOWNLOAD_DELAY_MS: u64 = 1000;

    /// Default token bucket rate
    pub const REQUESTS_PER_SECOND: u32 = 1;

    /// Default log level
    pub const LOG_LEVEL: &str = "info";

    /// Default JSON format setting
    pub const LOG_JSON_FORMAT: bool = false;

    /// Default console output setting
    pub const LOG_CONSOLE_OUTPUT: bool = true;

    /// Default file output setting
    pub const LOG_FILE_OUTPUT: bool = false;

    /// Default log directory
    pub const LOG_DIR: &str = "logs";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.throttle.delay(), Duration::from_secs(1));
        assert_eq!(config.scraper.base_dir, PathBuf::from("items"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut config = AppConfig::default();
        config.http.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ScrapeError::InvalidConfig { .. })));
    }

    #[test]
    fn token_bucket_needs_a_rate() {
        let mut config = AppConfig::default();
        config.throttle.strategy = ThrottleStrategy::TokenBucket;
        config.throttle.requests_per_second = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[scraper]
base_dir = "downloads"

[throttle]
strategy = "none"
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.scraper.base_dir, PathBuf::from("downloads"));
        assert_eq!(config.throttle.strategy, ThrottleStrategy::None);
        assert_eq!(config.http.timeout_seconds, defaults::REQUEST_TIMEOUT_SECONDS);
    }

    #[test]
    fn unknown_strategy_fails_to_load() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[throttle]\nstrategy = \"exponential\"").unwrap();

        assert!(matches!(
            AppConfig::load(Some(file.path())),
            Err(ScrapeError::Config(_))
        ));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.toml")));
        assert!(result.is_err());
    }
}
