use std::fmt;
use std::sync::Arc;

use crate::kernel::error::Result;
use crate::registry::Named;

/// Zero-argument job body. Runs on a blocking thread.
pub type JobHandler = Arc<dyn Fn() -> Result<()> + Send + Sync>;

/// Behaviour of an application job, implemented by job types that carry
/// their own state.
pub trait Job: Send + Sync + 'static {
    fn name(&self) -> &str;

    /// Cron expression with a leading seconds field.
    fn schedule(&self) -> &str;

    fn enabled(&self) -> bool {
        true
    }

    fn handle(&self) -> Result<()>;
}

/// A named, cron-triggered unit of work.
#[derive(Clone)]
pub struct ScheduledJob {
    name: String,
    cron: String,
    enabled: bool,
    handler: JobHandler,
}

impl ScheduledJob {
    pub fn new<F>(name: impl Into<String>, cron: impl Into<String>, handler: F) -> Self
    where
        F: Fn() -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            cron: cron.into(),
            enabled: true,
            handler: Arc::new(handler),
        }
    }

    /// Wrap a [`Job`] implementation, taking its name, schedule and
    /// enabled flag.
    pub fn from_job<J: Job>(job: J) -> Self {
        let job = Arc::new(job);
        let name = job.name().to_string();
        let cron = job.schedule().to_string();
        let enabled = job.enabled();
        Self {
            name,
            cron,
            enabled,
            handler: Arc::new(move || job.handle()),
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn cron(&self) -> &str {
        &self.cron
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn handler(&self) -> JobHandler {
        self.handler.clone()
    }

    /// Run the handler once on the current thread.
    pub fn run(&self) -> Result<()> {
        (self.handler)()
    }
}

impl Named for ScheduledJob {
    fn name(&self) -> &str {
        &self.name
    }

    fn describe(&self) -> String {
        format!("schedule={}, enabled={}", self.cron, self.enabled)
    }
}

impl fmt::Debug for ScheduledJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScheduledJob")
            .field("name", &self.name)
            .field("cron", &self.cron)
            .field("enabled", &self.enabled)
            .finish()
    }
}
