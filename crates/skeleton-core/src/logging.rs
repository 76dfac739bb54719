//! Logging backend setup.
//!
//! Library code only uses the `log` macros. The binary calls [`init`] once,
//! which installs a `tracing-subscriber` registry with a reloadable
//! `EnvFilter` and bridges `log` records into it. The returned [`LogHandle`]
//! is handed to the application, which raises the level once configuration
//! says `debug = true`. Nothing else touches global logger state.
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt as tracing_fmt, reload};

use crate::kernel::error::{Error, Result};

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(Error::from(format!("unknown log format '{other}'"))),
        }
    }
}

/// Handle for changing the active log filter after startup.
#[derive(Clone)]
pub struct LogHandle {
    reload: Option<reload::Handle<EnvFilter, Registry>>,
    directive: Arc<Mutex<String>>,
}

impl fmt::Debug for LogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogHandle")
            .field("directive", &self.directive())
            .field("attached", &self.reload.is_some())
            .finish()
    }
}

impl LogHandle {
    /// A handle that records filter changes without an installed subscriber.
    pub fn detached(directive: &str) -> Self {
        Self {
            reload: None,
            directive: Arc::new(Mutex::new(directive.to_string())),
        }
    }

    /// The directive currently in effect.
    pub fn directive(&self) -> String {
        self.directive
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the active filter, e.g. `debug` or `skeleton=trace,info`.
    pub fn set_directive(&self, directive: &str) -> Result<()> {
        let filter = EnvFilter::try_new(directive).map_err(|e| Error::Config {
            path: None,
            message: format!("invalid log filter '{directive}': {e}"),
        })?;
        if let Some(handle) = &self.reload {
            handle
                .reload(filter)
                .map_err(|e| Error::from(format!("failed to reload log filter: {e}")))?;
        }
        *self
            .directive
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = directive.to_string();
        log::debug!("Log filter set to '{}'", directive);
        Ok(())
    }
}

/// Install the global subscriber. `RUST_LOG`, when set, wins over
/// `default_directive`.
pub fn init(format: LogFormat, default_directive: &str) -> Result<LogHandle> {
    let directive = std::env::var(EnvFilter::DEFAULT_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default_directive.to_string());
    let filter = EnvFilter::try_new(&directive).map_err(|e| Error::Config {
        path: None,
        message: format!("invalid log filter '{directive}': {e}"),
    })?;
    let (filter_layer, reload_handle) = reload::Layer::new(filter);

    let text = (format == LogFormat::Text).then(|| tracing_fmt::layer().with_target(true));
    let json = (format == LogFormat::Json).then(|| tracing_fmt::layer().json());
    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(text)
        .with(json);

    tracing_log::LogTracer::init()
        .map_err(|e| Error::from(format!("failed to bridge log records: {e}")))?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::from(format!("failed to install subscriber: {e}")))?;

    Ok(LogHandle {
        reload: Some(reload_handle),
        directive: Arc::new(Mutex::new(directive)),
    })
}
