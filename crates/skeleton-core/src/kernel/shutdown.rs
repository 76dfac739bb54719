use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::time::Duration;

use futures::FutureExt;

use crate::kernel::error::{Error, Result};

type HookFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;
type Hook = Box<dyn FnOnce() -> HookFuture + Send>;

/// Ordered shutdown callbacks. Hooks run once, first registered first.
#[derive(Default)]
pub struct ShutdownHooks {
    hooks: Vec<(String, Hook)>,
}

impl fmt::Debug for ShutdownHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShutdownHooks")
            .field("hooks", &self.names())
            .finish()
    }
}

/// A hook that returned an error or panicked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HookFailure {
    pub hook: String,
    pub error: String,
}

/// Outcome of [`ShutdownHooks::run_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShutdownReport {
    pub executed: Vec<String>,
    pub failures: Vec<HookFailure>,
}

impl ShutdownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

impl ShutdownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, Fut>(&mut self, name: impl Into<String>, hook: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let hook: Hook = Box::new(move || -> HookFuture { Box::pin(hook()) });
        self.hooks.push((name.into(), hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.hooks.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Run every hook in registration order and drain the list.
    ///
    /// A failing or panicking hook is logged and recorded; the remaining
    /// hooks still run.
    pub async fn run_all(&mut self) -> ShutdownReport {
        let mut report = ShutdownReport::default();

        for (name, hook) in self.hooks.drain(..) {
            log::info!("Running shutdown hook: {}", name);
            let outcome = AssertUnwindSafe(async move { hook().await })
                .catch_unwind()
                .await;

            let error = match outcome {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e.to_string()),
                Err(panic) => Some(panic_message(panic.as_ref())),
            };
            if let Some(error) = error {
                log::error!("Shutdown hook '{}' failed: {}", name, error);
                report.failures.push(HookFailure {
                    hook: name.clone(),
                    error,
                });
            }
            report.executed.push(name);
        }

        if report.is_clean() {
            log::info!("Shutdown hooks complete ({} run)", report.executed.len());
        } else {
            log::warn!(
                "Shutdown hooks complete with {} failure(s) out of {}",
                report.failures.len(),
                report.executed.len()
            );
        }
        report
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

/// Await `fut`, failing with [`Error::ShutdownTimeout`] after `timeout`.
pub async fn within<F>(operation: &str, timeout: Duration, fut: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::ShutdownTimeout {
            operation: operation.to_string(),
            timeout,
        }),
    }
}
