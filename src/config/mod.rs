//! Configuration management for trendstitch
//!
//! Settings come from defaults, a TOML file, or `TRENDSTITCH_*` environment
//! variables; command-line flags are applied on top by the binary.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::stitch::StitchOptions;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Polling configuration
    pub sampler: SamplerConfig,

    /// Trends provider configuration
    pub provider: ProviderConfig,

    /// Stitching options
    pub stitch: StitchOptions,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Polling loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Minutes between polling ticks
    pub interval_minutes: u64,

    /// Skip a keyword on fetch failure instead of aborting
    pub keep_going: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 2,
            keep_going: false,
        }
    }
}

/// Trends provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider base URL
    pub base_url: String,

    /// Geography code
    pub geo: String,

    /// Interface language (`hl`)
    pub language: String,

    /// Category id (0 = all)
    pub category: u32,

    /// Search property ("" = web search)
    pub property: String,

    /// Lookback window
    pub time_window: String,

    /// Timezone offset in minutes (`tz`)
    pub tz_offset_minutes: i32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Maximum retry attempts for transient failures
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,

    /// Rate limit (requests per second)
    pub requests_per_second: u32,

    /// User agent override; a browser agent is rotated when unset
    pub user_agent: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("https://trends.google.com"),
            geo: String::from("US"),
            language: String::from("EN"),
            category: 0,
            property: String::new(),
            time_window: String::from("now 4-H"),
            tz_offset_minutes: 0,
            request_timeout_secs: 30,
            max_retries: 3,
            retry_base_delay_ms: 1000,
            requests_per_second: 1,
            user_agent: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

impl LoggingConfig {
    /// `EnvFilter` directive for this crate's logs; `verbose` forces debug
    #[must_use]
    pub fn filter_directive(&self, verbose: bool) -> String {
        if verbose {
            String::from("trendstitch=debug,info")
        } else {
            format!("trendstitch={},warn", self.level.to_ascii_lowercase())
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let sampler = SamplerConfig {
            interval_minutes: env_parse("TRENDSTITCH_INTERVAL_MINUTES")
                .unwrap_or(defaults.sampler.interval_minutes),
            keep_going: env_parse("TRENDSTITCH_KEEP_GOING").unwrap_or(defaults.sampler.keep_going),
        };

        let provider = ProviderConfig {
            base_url: std::env::var("TRENDSTITCH_BASE_URL")
                .unwrap_or(defaults.provider.base_url),
            geo: std::env::var("TRENDSTITCH_GEO").unwrap_or(defaults.provider.geo),
            language: std::env::var("TRENDSTITCH_LANGUAGE").unwrap_or(defaults.provider.language),
            request_timeout_secs: env_parse("TRENDSTITCH_REQUEST_TIMEOUT")
                .unwrap_or(defaults.provider.request_timeout_secs),
            max_retries: env_parse("TRENDSTITCH_MAX_RETRIES")
                .unwrap_or(defaults.provider.max_retries),
            requests_per_second: env_parse("TRENDSTITCH_RATE_LIMIT")
                .unwrap_or(defaults.provider.requests_per_second),
            user_agent: std::env::var("TRENDSTITCH_USER_AGENT").ok(),
            ..defaults.provider
        };

        let logging = LoggingConfig {
            level: std::env::var("TRENDSTITCH_LOG_LEVEL").unwrap_or(defaults.logging.level),
            format: std::env::var("TRENDSTITCH_LOG_FORMAT").unwrap_or(defaults.logging.format),
        };

        Ok(Self {
            sampler,
            provider,
            stitch: defaults.stitch,
            logging,
        })
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.sampler.interval_minutes == 0 {
            anyhow::bail!("interval_minutes must be greater than 0");
        }

        if self.provider.requests_per_second == 0 {
            anyhow::bail!("requests_per_second must be greater than 0");
        }

        if self.provider.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        for (name, value) in [
            ("geo", &self.provider.geo),
            ("language", &self.provider.language),
            ("time_window", &self.provider.time_window),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("{name} must not be empty");
            }
        }

        Url::parse(&self.provider.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.provider.base_url))?;

        if !LOG_LEVELS.contains(&self.logging.level.to_ascii_lowercase().as_str()) {
            anyhow::bail!(
                "Unknown log level: {} (expected one of {})",
                self.logging.level,
                LOG_LEVELS.join(", ")
            );
        }

        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            anyhow::bail!(
                "Unknown log format: {} (expected text or json)",
                self.logging.format
            );
        }

        Ok(())
    }

    /// Polling interval as Duration
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.sampler.interval_minutes * 60)
    }

}

impl ProviderConfig {
    /// Per-request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_match_reference_query() {
        let config = Config::default();
        assert_eq!(config.sampler.interval_minutes, 2);
        assert_eq!(config.provider.geo, "US");
        assert_eq!(config.provider.language, "EN");
        assert_eq!(config.provider.category, 0);
        assert_eq!(config.provider.time_window, "now 4-H");
        assert!(!config.stitch.scan_first_point);
        assert!(!config.stitch.drop_seam_duplicate);
    }

    #[test]
    fn test_zero_interval_rejected() {
        let mut config = Config::default();
        config.sampler.interval_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_geo_rejected() {
        let mut config = Config::default();
        config.provider.geo = "  ".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_base_url_rejected() {
        let mut config = Config::default();
        config.provider.base_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_log_settings_rejected() {
        let mut config = Config::default();
        config.logging.level = "loud".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown log level"));

        let mut config = Config::default();
        config.logging.format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown log format"));
    }

    #[test]
    fn test_filter_directive_follows_level() {
        let mut logging = LoggingConfig::default();
        assert_eq!(logging.filter_directive(false), "trendstitch=info,warn");

        logging.level = "DEBUG".into();
        assert_eq!(logging.filter_directive(false), "trendstitch=debug,warn");

        logging.level = "error".into();
        assert_eq!(logging.filter_directive(true), "trendstitch=debug,info");
    }

    #[test]
    fn test_duration_conversions() {
        let config = Config::default();
        assert_eq!(config.interval(), Duration::from_secs(120));
        assert_eq!(config.provider.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [sampler]
            interval_minutes = 5

            [stitch]
            scan_first_point = true
            "#,
        )
        .unwrap();

        assert_eq!(config.sampler.interval_minutes, 5);
        assert!(config.stitch.scan_first_point);
        assert_eq!(config.provider.geo, "US");
        assert_eq!(config.logging.format, "text");
    }
}
