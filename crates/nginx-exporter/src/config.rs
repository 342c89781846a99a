//! Configuration loading and validation for the nginx exporter

use common::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stub_status::{DEFAULT_STATUS_PATH, FetchOptions, HostTarget};
use thiserror::Error;
use validator::{Validate, ValidationError};

/// Environment variable naming an explicit configuration file
pub const CONFIG_ENV: &str = "NGINX_EXPORTER_CONFIG";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found in search paths")]
    FileNotFound,

    #[error("Failed to read configuration file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub nginx: NginxSettings,

    #[serde(default)]
    pub fetch: FetchSettings,

    #[serde(default)]
    pub exporter: ExporterSettings,

    #[serde(default)]
    pub logging: LoggingSettings,

    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        self.nginx.validate()?;
        self.fetch.validate()?;
        self.exporter.validate()?;
        Ok(())
    }
}

/// Upstream nginx hosts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct NginxSettings {
    /// `host:port` of every nginx exposing a stub status page
    #[validate(length(min = 1), custom = "validate_hosts")]
    pub hosts: Vec<String>,

    #[validate(custom = "validate_http_path")]
    pub status_path: String,
}

/// Status fetch timeouts
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct FetchSettings {
    #[serde(with = "humantime_serde")]
    #[validate(custom = "validate_timeout")]
    pub connect_timeout: Duration,

    #[serde(with = "humantime_serde")]
    #[validate(custom = "validate_timeout")]
    pub header_timeout: Duration,

    #[serde(with = "humantime_serde")]
    #[validate(custom = "validate_timeout")]
    pub body_timeout: Duration,
}

/// Export endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ExporterSettings {
    #[validate(length(min = 1))]
    pub listen_address: String,

    #[validate(custom = "validate_metrics_path")]
    pub metrics_path: String,
}

/// Logging settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub format: LogFormat,
}

/// OpenTelemetry span export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    pub enabled: bool,
    pub service_name: String,
    pub otlp_endpoint: String,
}

// Default implementations

impl Default for NginxSettings {
    fn default() -> Self {
        Self {
            hosts: Vec::new(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
        }
    }
}

impl Default for FetchSettings {
    fn default() -> Self {
        let options = FetchOptions::default();
        Self {
            connect_timeout: options.connect_timeout,
            header_timeout: options.header_timeout,
            body_timeout: options.body_timeout,
        }
    }
}

impl Default for ExporterSettings {
    fn default() -> Self {
        Self {
            listen_address: "0.0.0.0:9113".to_string(),
            metrics_path: "/metrics".to_string(),
        }
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: "nginx-exporter".to_string(),
            otlp_endpoint: "http://localhost:4317".to_string(),
        }
    }
}

// Custom validators

fn validate_hosts(hosts: &[String]) -> Result<(), ValidationError> {
    for host in hosts {
        let trimmed = host.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("host_empty"));
        }
        if trimmed.contains("://") || trimmed.contains('/') || trimmed.contains(char::is_whitespace)
        {
            return Err(ValidationError::new("host_invalid_format"));
        }
    }
    Ok(())
}

fn validate_http_path(path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::new("path_must_start_with_slash"));
    }
    if path.contains(char::is_whitespace) {
        return Err(ValidationError::new("path_contains_whitespace"));
    }
    Ok(())
}

fn validate_metrics_path(path: &str) -> Result<(), ValidationError> {
    validate_http_path(path)?;
    // "/" serves the landing page
    if path == "/" {
        return Err(ValidationError::new("metrics_path_is_root"));
    }
    Ok(())
}

fn validate_timeout(timeout: &Duration) -> Result<(), ValidationError> {
    let millis = timeout.as_millis();
    if !(10..=30_000).contains(&millis) {
        return Err(ValidationError::new("timeout_out_of_range"));
    }
    Ok(())
}

// Configuration loading implementation

impl Config {
    /// Configuration file path: `$NGINX_EXPORTER_CONFIG`, else the first
    /// existing file in the default search paths
    pub fn locate() -> Result<PathBuf, ConfigError> {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .or_else(Self::find_config_file)
            .ok_or(ConfigError::FileNotFound)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    /// Parse and validate a YAML document
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let mut paths = vec![PathBuf::from("/etc/nginx-exporter/config.yaml")];

        if let Some(home_path) = Self::home_config_path() {
            paths.push(home_path);
        }

        paths.push(PathBuf::from("./config.yaml"));

        paths.into_iter().find(|p| p.is_file())
    }

    fn home_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/nginx-exporter/config.yaml"))
    }

    /// One target per configured host, in configuration order
    pub fn targets(&self) -> Vec<HostTarget> {
        self.nginx
            .hosts
            .iter()
            .map(|host| HostTarget::new(host.trim(), &self.nginx.status_path))
            .collect()
    }

    /// Timeouts for the status fetcher
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: self.fetch.connect_timeout,
            header_timeout: self.fetch.header_timeout,
            body_timeout: self.fetch.body_timeout,
        }
    }

    /// Effective default log level
    pub fn log_level(&self) -> &str {
        self.logging.level.as_deref().unwrap_or("info")
    }
}
