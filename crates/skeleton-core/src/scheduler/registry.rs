use crate::kernel::error::{Error, Result};
use crate::registry::{Named, Registry};
use crate::scheduler::Scheduler;
use crate::scheduler::job::ScheduledJob;

/// Ordered collection of scheduled jobs.
pub type JobRegistry = Registry<ScheduledJob>;

impl Registry<ScheduledJob> {
    /// Create an empty job registry.
    pub fn jobs() -> Self {
        Registry::new("job")
    }

    /// Enabled jobs, in registration order.
    pub fn enabled_jobs(&self) -> Vec<&ScheduledJob> {
        self.iter().filter(|job| job.is_enabled()).collect()
    }

    /// Hand every enabled job to `scheduler`, in registration order.
    ///
    /// Stops at the first job the scheduler rejects. Jobs scheduled before it
    /// stay scheduled. Returns the number of jobs scheduled.
    pub async fn schedule_all(&self, scheduler: &dyn Scheduler) -> Result<usize> {
        let enabled = self.enabled_jobs();

        for job in &enabled {
            scheduler
                .schedule(job.cron(), job.name(), job.handler())
                .await
                .map_err(|e| Error::JobScheduling {
                    job: job.name().to_string(),
                    source: Box::new(e),
                })?;
            log::info!("Job scheduled: {} ({})", job.name(), job.cron());
        }

        log::info!(
            "All jobs scheduled: {} registered, {} enabled",
            self.count(),
            enabled.len()
        );
        Ok(enabled.len())
    }
}
