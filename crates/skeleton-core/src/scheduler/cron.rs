use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::kernel::component::Lifecycle;
use crate::kernel::error::{Error, Result};
use crate::scheduler::{JobHandler, Scheduler};

/// [`Scheduler`] backed by `tokio-cron-scheduler`.
///
/// The underlying `JobScheduler` is created on first use, so constructing a
/// `CronScheduler` never touches the runtime.
#[derive(Default)]
pub struct CronScheduler {
    inner: OnceCell<JobScheduler>,
    scheduled: Mutex<Vec<String>>,
}

impl CronScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    async fn scheduler(&self) -> Result<&JobScheduler> {
        self.inner
            .get_or_try_init(|| async {
                JobScheduler::new()
                    .await
                    .map_err(|e| Error::Scheduler(format!("failed to create job scheduler: {e}")))
            })
            .await
    }

    /// Names of jobs accepted so far, in scheduling order.
    pub fn scheduled_jobs(&self) -> Vec<String> {
        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

async fn run_job(name: String, handler: JobHandler) {
    log::debug!("Running job: {}", name);
    match tokio::task::spawn_blocking(move || handler()).await {
        Ok(Ok(())) => log::debug!("Job completed: {}", name),
        Ok(Err(e)) => log::error!("Job '{}' failed: {}", name, e),
        Err(e) => log::error!("Job '{}' panicked: {}", name, e),
    }
}

#[async_trait]
impl Lifecycle for CronScheduler {
    fn name(&self) -> &str {
        "cron-scheduler"
    }

    async fn start(&self) -> Result<()> {
        self.scheduler()
            .await?
            .start()
            .await
            .map_err(|e| Error::Scheduler(format!("failed to start: {e}")))
    }

    async fn stop(&self) -> Result<()> {
        // Never started or scheduled anything: nothing to shut down.
        let Some(scheduler) = self.inner.get() else {
            return Ok(());
        };
        let mut scheduler = scheduler.clone();
        scheduler
            .shutdown()
            .await
            .map_err(|e| Error::Scheduler(format!("failed to shut down: {e}")))
    }
}

#[async_trait]
impl Scheduler for CronScheduler {
    async fn schedule(&self, cron: &str, name: &str, handler: JobHandler) -> Result<()> {
        let job_name = name.to_string();
        let job = Job::new_async(cron, move |_uuid, _lock| {
            let name = job_name.clone();
            let handler = handler.clone();
            Box::pin(async move { run_job(name, handler).await })
        })
        .map_err(|e| Error::Scheduler(format!("invalid cron expression '{cron}': {e}")))?;

        self.scheduler()
            .await?
            .add(job)
            .await
            .map_err(|e| Error::Scheduler(e.to_string()))?;

        self.scheduled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.to_string());
        Ok(())
    }
}
