use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Upstream catalog site and the transport budget used against it
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    pub base_url: String,
    /// Total budget for one fetch, challenge retries and negotiation included
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://mydramalist.com".to_string(),
            timeout_seconds: 20,
            connect_timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl UpstreamConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Connect timeout, never larger than the total budget
    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        let connect = if self.connect_timeout_seconds == 0 {
            self.timeout_seconds
        } else {
            self.connect_timeout_seconds.min(self.timeout_seconds)
        };
        Duration::from_secs(connect)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // KURYANA_UPSTREAM__BASE_URL, KURYANA_SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("KURYANA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Check settings that would otherwise only fail on the first request.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match url::Url::parse(&self.upstream.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(format!(
                "upstream.base_url must be http(s), got scheme '{}'",
                url.scheme()
            )),
            Err(e) => errors.push(format!("upstream.base_url is invalid: {e}")),
        }

        if self.upstream.timeout_seconds == 0 {
            errors.push("upstream.timeout_seconds must be greater than zero".to_string());
        }

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be 'json' or 'pretty', got '{}'",
                self.logging.format
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Get HTTP listen address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Load configuration from config file or environment variables
///
/// Config file search order:
/// 1. `KURYANA_CONFIG_PATH` environment variable (explicit path)
/// 2. ./config.yaml (current working directory)
/// 3. Fall back to environment variables only
pub fn load_config() -> anyhow::Result<Config> {
    let config_path = std::env::var("KURYANA_CONFIG_PATH")
        .ok()
        .filter(|p| Path::new(p).exists())
        .or_else(|| {
            let cwd = "config.yaml";
            Path::new(cwd).exists().then(|| cwd.to_string())
        });

    let config = if let Some(path) = config_path {
        eprintln!("Loading config from {path}");
        Config::from_file(&path)?
    } else {
        Config::from_env().unwrap_or_else(|e| {
            eprintln!("Failed to load config: {e}");
            eprintln!("Using default configuration");
            Config::default()
        })
    };

    if let Err(errors) = config.validate() {
        return Err(anyhow::anyhow!(
            "Configuration validation failed with {} error(s): {}",
            errors.len(),
            errors.join("; ")
        ));
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_address(), "0.0.0.0:8000");
        assert_eq!(config.upstream.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_validate_rejects_bad_upstream() {
        let mut config = Config::default();
        config.upstream.base_url = "ftp://example.com".to_string();
        config.upstream.timeout_seconds = 0;
        config.logging.format = "xml".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].contains("http(s)"));
    }

    #[test]
    fn test_connect_timeout_is_capped_by_total() {
        let upstream = UpstreamConfig {
            timeout_seconds: 5,
            connect_timeout_seconds: 30,
            ..UpstreamConfig::default()
        };
        assert_eq!(upstream.connect_timeout(), Duration::from_secs(5));

        let upstream = UpstreamConfig {
            connect_timeout_seconds: 0,
            ..UpstreamConfig::default()
        };
        assert_eq!(upstream.connect_timeout(), upstream.timeout());
    }
}
