//! Configuration management for the MCP server.
//!
//! Settings come from the process environment, optionally seeded from a
//! `.env` file, with defaults for everything.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Default address of the Minecraft REST API.
pub const DEFAULT_API_URL: &str = "http://localhost:7070";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Remote Minecraft API connection settings.
    pub minecraft: MinecraftConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Problems found while reading the environment. Loading happens before
    /// the subscriber is installed, so these are held for [`Config::log_warnings`].
    #[serde(skip)]
    pub warnings: Vec<String>,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Connection settings for the Minecraft REST API.
#[derive(Clone, Serialize, Deserialize)]
pub struct MinecraftConfig {
    /// Base URL of the remote API, without a trailing slash.
    #[serde(serialize_with = "serialize_redacted_url")]
    pub base_url: String,

    /// Per-call-class request timeouts.
    pub timeouts: TimeoutConfig,
}

/// Base URLs may embed credentials, so only the redacted form is printed.
impl std::fmt::Debug for MinecraftConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MinecraftConfig")
            .field("base_url", &safe_url(&self.base_url))
            .field("timeouts", &self.timeouts)
            .finish()
    }
}

impl Default for MinecraftConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

/// Request timeouts in seconds, one per call class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Ordinary calls.
    pub default_secs: u64,
    /// Structure file uploads.
    pub structure_secs: u64,
    /// Build execution.
    pub build_secs: u64,
    /// Liveness probe.
    pub probe_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_secs: 15,
            structure_secs: 60,
            build_secs: 120,
            probe_secs: 5,
        }
    }
}

impl TimeoutConfig {
    pub fn ordinary(&self) -> Duration {
        Duration::from_secs(self.default_secs)
    }

    pub fn structure(&self) -> Duration {
        Duration::from_secs(self.structure_secs)
    }

    pub fn build(&self) -> Duration {
        Duration::from_secs(self.build_secs)
    }

    pub fn probe(&self) -> Duration {
        Duration::from_secs(self.probe_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "minecraft-api".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            minecraft: MinecraftConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            warnings: Vec::new(),
        }
    }
}

fn serialize_redacted_url<S: serde::Serializer>(url: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&safe_url(url))
}

/// Replace any password embedded in `url` with `****`.
///
/// Strings that do not parse as URLs are withheld entirely.
pub fn safe_url(url: &str) -> String {
    match reqwest::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() && parsed.set_password(Some("****")).is_err() {
                return "[unprintable url]".to_string();
            }
            parsed.as_str().trim_end_matches('/').to_string()
        }
        Err(_) => "[unprintable url]".to_string(),
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

/// Read a positive number of seconds, falling back to `default`.
fn timeout_from_env(key: &str, default: u64, warnings: &mut Vec<String>) -> u64 {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(secs) if secs > 0 => secs,
            _ => {
                warnings.push(format!("Ignoring invalid {}={:?}, using {}s", key, raw, default));
                default
            }
        },
        Err(_) => default,
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a `.env` file in the working directory (if
    /// any) and the process environment.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_process_env()
    }

    /// Load configuration from a specific `.env` file plus the environment.
    ///
    /// Variables already set in the process take precedence over the file.
    pub fn from_env_file(path: impl AsRef<Path>) -> super::Result<Self> {
        dotenvy::from_path(path.as_ref()).map_err(|e| {
            super::Error::config(format!("cannot load {}: {}", path.as_ref().display(), e))
        })?;
        Ok(Self::from_process_env())
    }

    /// Emit the warnings gathered while loading. Call once logging is up.
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }

    fn from_process_env() -> Self {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if std::env::var("DEBUG").is_ok_and(|v| is_truthy(&v)) {
            config.logging.level = "debug".to_string();
        }

        let base_url = std::env::var("MINECRAFT_API_URL")
            .or_else(|_| std::env::var("BASE_URL"))
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());
        match base_url {
            Some(url) => config.minecraft.base_url = url,
            None => config.warnings.push(format!(
                "MINECRAFT_API_URL not set - using default {}",
                DEFAULT_API_URL
            )),
        }

        let defaults = TimeoutConfig::default();
        let warnings = &mut config.warnings;
        config.minecraft.timeouts = TimeoutConfig {
            default_secs: timeout_from_env(
                "MINECRAFT_TIMEOUT_SECS",
                defaults.default_secs,
                warnings,
            ),
            structure_secs: timeout_from_env(
                "MINECRAFT_STRUCTURE_TIMEOUT_SECS",
                defaults.structure_secs,
                warnings,
            ),
            build_secs: timeout_from_env(
                "MINECRAFT_BUILD_TIMEOUT_SECS",
                defaults.build_secs,
                warnings,
            ),
            probe_secs: timeout_from_env(
                "MINECRAFT_PROBE_TIMEOUT_SECS",
                defaults.probe_secs,
                warnings,
            ),
        };

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        config
    }
}
