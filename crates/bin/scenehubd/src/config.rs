//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `scenehub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use scenehub_app::dispatcher::DispatcherConfig;
use scenehub_app::services::scene_service::SceneServiceConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Local site identity.
    pub site: SiteConfig,
    /// Presets document settings.
    pub presets: PresetsConfig,
    /// Command dispatcher settings.
    pub dispatcher: DispatcherSettings,
    /// State-capture settings.
    pub capture: CaptureConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// Identity of the site this instance manages scenes for.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Local site id; `site:` scopes normalize against it.
    pub id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            id: "local".to_string(),
        }
    }
}

/// Presets document location and schema version.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PresetsConfig {
    /// Path of the JSON presets file.
    pub path: String,
    /// Version stamped on a fresh document.
    pub version: String,
}

impl Default for PresetsConfig {
    fn default() -> Self {
        Self {
            path: "presets.json".to_string(),
            version: "1.0".to_string(),
        }
    }
}

/// Worker pool tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DispatcherSettings {
    /// Number of concurrent dispatch workers.
    pub workers: usize,
    /// Capacity of the pending-command queue.
    pub queue_depth: usize,
    /// Per-command remote call timeout, in seconds.
    pub call_timeout_secs: u64,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        let defaults = DispatcherConfig::default();
        Self {
            workers: defaults.workers,
            queue_depth: defaults.queue_depth,
            call_timeout_secs: defaults.call_timeout.as_secs(),
        }
    }
}

/// State-capture settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Channel schemas excluded from capture.
    pub excluded_schemas: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Errors produced while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Load configuration from `scenehub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if
    /// the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("scenehub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("SCENEHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("SCENEHUB_PORT")
            && let Ok(port) = val.parse()
        {
            self.server.port = port;
        }
        if let Ok(val) = std::env::var("SCENEHUB_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("SCENEHUB_SITE_ID") {
            self.site.id = val;
        }
        if let Ok(val) = std::env::var("SCENEHUB_PRESETS_PATH") {
            self.presets.path = val;
        }
        if let Ok(val) = std::env::var("SCENEHUB_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.site.id.is_empty() {
            return Err(ConfigError::Invalid("site.id must not be empty".to_string()));
        }
        if self.presets.path.is_empty() {
            return Err(ConfigError::Invalid(
                "presets.path must not be empty".to_string(),
            ));
        }
        if self.dispatcher.workers == 0 {
            return Err(ConfigError::Invalid(
                "dispatcher.workers must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// The bind address for the HTTP listener.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Dispatcher configuration for the worker pool.
    #[must_use]
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            workers: self.dispatcher.workers,
            queue_depth: self.dispatcher.queue_depth,
            call_timeout: Duration::from_secs(self.dispatcher.call_timeout_secs),
        }
    }

    /// Scene service configuration.
    #[must_use]
    pub fn scene_service_config(&self) -> SceneServiceConfig {
        SceneServiceConfig {
            site_id: self.site.id.clone(),
            version: self.presets.version.clone(),
            excluded_schemas: self
                .capture
                .excluded_schemas
                .iter()
                .cloned()
                .collect::<HashSet<String>>(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_provide_defaults_for_every_field() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.site.id, "local");
        assert_eq!(config.presets.path, "presets.json");
        assert_eq!(config.dispatcher_config().workers, 10);
    }

    #[test]
    fn should_parse_full_toml_document() {
        let config: Config = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [site]
            id = "a458dfe3"

            [presets]
            path = "/var/lib/scenehub/presets.json"

            [dispatcher]
            workers = 4
            queue_depth = 16
            call_timeout_secs = 5

            [capture]
            excluded_schemas = ["/protocol/battery"]

            [logging]
            filter = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.site.id, "a458dfe3");
        let dispatcher = config.dispatcher_config();
        assert_eq!(dispatcher.workers, 4);
        assert_eq!(dispatcher.call_timeout, Duration::from_secs(5));
        assert!(
            config
                .scene_service_config()
                .excluded_schemas
                .contains("/protocol/battery")
        );
    }

    #[test]
    fn should_reject_zero_workers() {
        let mut config = Config::default();
        config.dispatcher.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_empty_site_id() {
        let mut config = Config::default();
        config.site.id = String::new();
        assert!(config.validate().is_err());
    }
}
