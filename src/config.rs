//! Top-level application configuration.
//!
//! Configuration is stored in `<home>/config.yaml` (see [`crate::paths`]) and includes:
//! - The base URL of the record services
//! - Request timeout and search debounce
//! - Per-kind page size overrides
//! - Logging settings

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::entity::EntityKind;
use crate::error::{Result, StewardError};
use crate::paths;

/// Environment variable that overrides `base_url`.
pub const BASE_URL_ENV: &str = "STEWARD_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:5000/api/";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root of the REST services; each record kind lives under `<base_url>/<kind>`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Quiet period before a typed search is sent, in milliseconds (default: 500)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Page size overrides keyed by record kind
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub page_sizes: BTreeMap<String, u32>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_search_debounce_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            search_debounce_ms: default_search_debounce_ms(),
            page_sizes: BTreeMap::new(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset (default: warn)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `text` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from file, or return default if not found.
    ///
    /// `STEWARD_BASE_URL` takes precedence over the file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;

        if let Ok(url) = env::var(BASE_URL_ENV)
            && !url.trim().is_empty()
        {
            config.base_url = url.trim().to_string();
        }

        Ok(config)
    }

    /// Load only what is on disk, without environment overrides.
    pub fn load_file() -> Result<Self> {
        let path = paths::config_path();
        let config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                StewardError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read config at {}: {}", path.display(), e),
                ))
            })?;
            serde_yaml_ng::from_str(&content)?
        } else {
            Config::default()
        };

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = paths::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StewardError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            StewardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        Ok(())
    }

    /// Parsed base URL, always ending in `/` so that kind paths join beneath it.
    pub fn base_url(&self) -> Result<Url> {
        let raw = self.base_url.trim();
        let normalized = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };

        let url = Url::parse(&normalized)?;
        if url.cannot_be_a_base() {
            return Err(StewardError::Config(format!(
                "base_url '{raw}' cannot hold resource paths"
            )));
        }
        Ok(url)
    }

    /// Get the request timeout duration (never shorter than one second)
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout.max(1))
    }

    /// Get the search debounce duration
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Page size for a record kind, honouring overrides.
    pub fn page_size(&self, kind: EntityKind) -> u32 {
        self.page_sizes
            .get(kind.as_str())
            .copied()
            .filter(|size| *size > 0)
            .unwrap_or_else(|| kind.default_page_size())
    }

    /// Set a configuration value by dotted key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "base_url" => {
                let candidate = Config {
                    base_url: value.to_string(),
                    ..Config::default()
                };
                candidate.base_url()?;
                self.base_url = candidate.base_url;
            }
            "request_timeout" => {
                self.request_timeout = parse_number(key, value)?;
            }
            "search_debounce_ms" => {
                self.search_debounce_ms = parse_number(key, value)?;
            }
            "logging.level" => {
                self.logging.level = value.to_string();
            }
            "logging.format" => match value {
                "text" | "json" => self.logging.format = value.to_string(),
                _ => {
                    return Err(StewardError::Config(format!(
                        "invalid logging.format '{value}', expected 'text' or 'json'"
                    )));
                }
            },
            _ => {
                let Some(kind) = key.strip_prefix("page_size.") else {
                    return Err(StewardError::Config(format!(
                        "unknown config key '{key}'"
                    )));
                };
                let kind: EntityKind = kind.parse()?;
                let size: u32 = parse_number(key, value)?;
                if size == 0 {
                    return Err(StewardError::Config(
                        "page size must be at least 1".to_string(),
                    ));
                }
                self.page_sizes.insert(kind.as_str().to_string(), size);
            }
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| StewardError::Config(format!("'{value}' is not a valid number for {key}")))
}
