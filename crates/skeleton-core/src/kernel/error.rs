//! # Skeleton Kernel Errors
//!
//! Defines the error type shared by every part of `skeleton-core`.
//!
//! [`Error`] carries enough context (provider name, binding key, job name,
//! lifecycle phase) for the top-level caller to report exactly which part of
//! the boot or shutdown sequence failed.
use std::path::PathBuf;
use std::result::Result as StdResult;
use std::time::Duration;

use thiserror::Error as ThisError;

use crate::kernel::lifecycle::LifecycleState;

/// Error type for container, provider, scheduling and lifecycle operations
#[derive(Debug, ThisError)]
pub enum Error {
    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        component_name: Option<String>,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// A lifecycle transition was attempted out of order.
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: LifecycleState, to: LifecycleState },

    // --- Configuration ---
    #[error("Configuration error for '{}': {message}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<inline>".into()))]
    Config { path: Option<PathBuf>, message: String },

    #[error("Configuration validation failed: {0}")]
    ConfigValidation(#[from] validator::ValidationErrors),

    // --- Providers ---
    #[error("Failed to register provider '{provider}': {source}")]
    ProviderRegistration {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Failed to boot provider '{provider}': {source}")]
    ProviderBoot {
        provider: String,
        #[source]
        source: Box<Error>,
    },

    // --- Container ---
    #[error("No binding registered for '{key}'")]
    BindingNotFound { key: String },

    #[error("Binding '{key}' holds {found}, requested as {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Failed to resolve '{key}': {source}")]
    Resolution {
        key: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Circular dependency detected: {}", chain.join(" -> "))]
    CircularDependency { chain: Vec<String> },

    #[error("Binding '{key}' is already resolved and cannot be replaced")]
    AlreadyResolved { key: String },

    #[error("Binding '{key}' is being constructed and cannot be replaced")]
    BindingInUse { key: String },

    // --- Scheduling ---
    #[error("Failed to schedule job '{job}': {source}")]
    JobScheduling {
        job: String,
        #[source]
        source: Box<Error>,
    },

    #[error("Scheduler error: {0}")]
    Scheduler(String),

    // --- Drivers and transport ---
    #[error("Unsupported {service} driver '{driver}'")]
    UnsupportedDriver { service: &'static str, driver: String },

    #[error("I/O error during '{operation}' on '{}': {source}", path.as_ref().map(|p| p.display().to_string()).unwrap_or_else(|| "<none>".into()))]
    Io {
        operation: String,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },

    #[error("Path '{path}' escapes the storage root")]
    PathOutsideRoot { path: PathBuf },

    #[error("Service '{service}' error: {message}")]
    Service { service: &'static str, message: String },

    #[error("HTTP server error: {message}")]
    Server {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("'{operation}' did not complete within {timeout:?}")]
    ShutdownTimeout { operation: String, timeout: Duration },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Configure")]
    Configure,
    #[error("Register")]
    Register,
    #[error("Boot")]
    Boot,
    #[error("Start")]
    Start,
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}

impl Error {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: Option<PathBuf>) -> Self {
        Error::Io {
            operation: operation.into(),
            path,
            source,
        }
    }

    pub fn service(service: &'static str, message: impl Into<String>) -> Self {
        Error::Service {
            service,
            message: message.into(),
        }
    }

    /// Folds per-item shutdown failures into a single error for `phase`.
    ///
    /// Every failure is expected to have been logged already; the returned
    /// error keeps the first one as its source.
    pub(crate) fn collect(
        phase: KernelLifecyclePhase,
        scope: &str,
        failures: Vec<(String, Error)>,
    ) -> Result<()> {
        let count = failures.len();
        let mut failures = failures.into_iter();
        match failures.next() {
            None => Ok(()),
            Some((name, first)) => Err(Error::KernelLifecycleError {
                phase,
                component_name: Some(name),
                message: format!("{count} {scope}"),
                source: Some(Box::new(first)),
            }),
        }
    }
}
