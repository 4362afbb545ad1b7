//! Application configuration loaded from environment variables.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Server Configuration ===
    /// HTTP server port.
    #[serde(default = "default_port")]
    pub port: u16,

    // === Dataset Sources ===
    /// URL of the mpg dataset (CSV).
    #[serde(default = "default_mpg_url")]
    pub mpg_url: String,

    /// URL of the midwest dataset (CSV).
    #[serde(default = "default_midwest_url")]
    pub midwest_url: String,

    /// Timeout for dataset fetches in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Rendering ===
    /// Optional RNG seed; when set, the random-data routes become
    /// reproducible.
    #[serde(default)]
    pub plot_seed: Option<u64>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_port() -> u16 {
    8080
}

fn default_mpg_url() -> String {
    "https://raw.githubusercontent.com/selva86/datasets/master/mpg_ggplot2.csv".to_string()
}

fn default_midwest_url() -> String {
    "https://raw.githubusercontent.com/selva86/datasets/master/midwest_filter.csv".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.mpg_url.starts_with("http://") && !self.mpg_url.starts_with("https://") {
            return Err("MPG_URL must be an http(s) URL".to_string());
        }

        if !self.midwest_url.starts_with("http://") && !self.midwest_url.starts_with("https://") {
            return Err("MIDWEST_URL must be an http(s) URL".to_string());
        }

        if self.http_timeout_ms == 0 {
            return Err("HTTP_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: default_port(),
            mpg_url: default_mpg_url(),
            midwest_url: default_midwest_url(),
            http_timeout_ms: default_http_timeout_ms(),
            plot_seed: None,
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_port(), 8080);
        assert!(default_mpg_url().ends_with("mpg_ggplot2.csv"));
        assert!(default_midwest_url().ends_with("midwest_filter.csv"));
        assert!(default_http_timeout_ms() > 0);
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_non_http_dataset_url() {
        let config = Config {
            mpg_url: "/var/data/mpg.csv".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = Config {
            http_timeout_ms: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
