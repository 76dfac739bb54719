//! # Skeleton Configuration
//!
//! Typed application settings, loaded from a TOML, YAML or JSON file (chosen
//! by extension, see [`ConfigFormat`]), overridden from the environment and
//! validated before any provider runs.
//!
//! Only the `[app]` section is required; every other section has defaults.
//!
//! Environment overrides:
//! - `SKELETON_ENV` replaces `app.env`
//! - `SKELETON_DEBUG` replaces `app.debug` (`true`/`false`, `1`/`0`, `yes`/`no`)
pub mod format;

pub use format::ConfigFormat;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::kernel::error::{Error, Result};

pub const ENV_OVERRIDE: &str = "SKELETON_ENV";
pub const DEBUG_OVERRIDE: &str = "SKELETON_DEBUG";

/// Accepted values for `app.env`.
pub const ENVIRONMENTS: [&str; 3] = ["development", "staging", "production"];

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Settings {
    #[validate(nested)]
    pub app: AppConfig,
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,
    #[serde(default)]
    #[validate(nested)]
    pub cache: CacheConfig,
    #[serde(default)]
    #[validate(nested)]
    pub queue: QueueConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    #[validate(nested)]
    pub filesystem: FilesystemConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(length(min = 3, message = "app.name must be at least 3 characters"))]
    pub name: String,
    #[serde(default = "default_env")]
    #[validate(custom(function = "validate_environment"))]
    pub env: String,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_shutdown_timeout")]
    #[validate(range(min = 1, message = "server.shutdown_timeout_secs must be at least 1"))]
    pub shutdown_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CacheConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    /// Seconds; `0` disables the default TTL. Bounded by the cache's
    /// `MAX_TTL` (100 years).
    #[serde(default = "default_cache_ttl")]
    #[validate(range(max = 3153600000u64, message = "cache.default_ttl_secs must be at most 100 years"))]
    pub default_ttl_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueueConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default = "default_queue_capacity")]
    #[validate(range(min = 1, message = "queue.capacity must be at least 1"))]
    pub capacity: usize,
    #[serde(default = "default_drain_timeout")]
    pub drain_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FilesystemConfig {
    #[serde(default = "default_filesystem_driver")]
    pub driver: String,
    /// Storage root. Relative paths resolve against the working directory.
    #[serde(default = "default_filesystem_root")]
    #[validate(custom(function = "validate_root"))]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Job names switched off regardless of their own enabled flag.
    #[serde(default)]
    pub disabled_jobs: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive applied after configuration loads, e.g. `info` or
    /// `skeleton=debug,info`. `app.debug` takes precedence.
    #[serde(default)]
    pub level: Option<String>,
}

fn default_env() -> String {
    "development".to_string()
}

fn default_addr() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_driver() -> String {
    "memory".to_string()
}

fn default_filesystem_driver() -> String {
    "local".to_string()
}

fn default_filesystem_root() -> PathBuf {
    PathBuf::from("storage")
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_drain_timeout() -> u64 {
    5
}

fn validate_environment(env: &str) -> std::result::Result<(), ValidationError> {
    if ENVIRONMENTS.contains(&env) {
        Ok(())
    } else {
        let mut error = ValidationError::new("environment");
        error.message = Some(format!("app.env must be one of {}", ENVIRONMENTS.join(", ")).into());
        Err(error)
    }
}

fn validate_root(root: &Path) -> std::result::Result<(), ValidationError> {
    if root.as_os_str().is_empty() {
        let mut error = ValidationError::new("root");
        error.message = Some("filesystem.root must not be empty".into());
        Err(error)
    } else {
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            shutdown_timeout_secs: default_shutdown_timeout(),
        }
    }
}

impl ServerConfig {
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            default_ttl_secs: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Option<Duration> {
        (self.default_ttl_secs > 0).then(|| Duration::from_secs(self.default_ttl_secs))
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            capacity: default_queue_capacity(),
            drain_timeout_secs: default_drain_timeout(),
        }
    }
}

impl QueueConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_secs(self.drain_timeout_secs)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            url: None,
        }
    }
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            driver: default_filesystem_driver(),
            root: default_filesystem_root(),
        }
    }
}

impl SchedulerConfig {
    pub fn is_disabled(&self, job: &str) -> bool {
        self.disabled_jobs.iter().any(|name| name == job)
    }
}

impl Settings {
    /// Settings with every section at its default and the given app name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            app: AppConfig {
                name: name.into(),
                env: default_env(),
                debug: false,
            },
            server: ServerConfig::default(),
            cache: CacheConfig::default(),
            queue: QueueConfig::default(),
            database: DatabaseConfig::default(),
            filesystem: FilesystemConfig::default(),
            scheduler: SchedulerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Read, override from the process environment and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| Error::Config {
            path: Some(path.to_path_buf()),
            message: "unsupported configuration format".to_string(),
        })?;
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            path: Some(path.to_path_buf()),
            message: format!("cannot read file: {e}"),
        })?;

        let mut settings = Self::parse(&content, format, Some(path.to_path_buf()))?;
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate_all()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(settings)
    }

    /// Parse settings from a string without overrides or validation.
    pub fn parse(content: &str, format: ConfigFormat, path: Option<PathBuf>) -> Result<Self> {
        format
            .parse(content)
            .map_err(|message| Error::Config { path, message })
    }

    /// Apply `SKELETON_ENV` / `SKELETON_DEBUG` style overrides from `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(env) = lookup(ENV_OVERRIDE) {
            log::debug!("{} overrides app.env: {}", ENV_OVERRIDE, env);
            self.app.env = env;
        }
        if let Some(raw) = lookup(DEBUG_OVERRIDE) {
            self.app.debug = match raw.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(Error::Config {
                        path: None,
                        message: format!("{DEBUG_OVERRIDE} must be a boolean, got '{other}'"),
                    });
                }
            };
        }
        Ok(())
    }

    /// Structural validation; failure is a configuration error.
    pub fn validate_all(&self) -> Result<()> {
        self.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.app.env == "production"
    }
}

#[cfg(test)]
mod tests;
