//! Scheduled jobs. Add new jobs to [`load_all`].
mod example;
mod user_stats;

pub use example::ExampleJob;
pub use user_stats::UserStatsJob;

use skeleton_core::config::Settings;
use skeleton_core::container::Container;
use skeleton_core::registry::Named;
use skeleton_core::scheduler::{JobRegistry, ScheduledJob};
use skeleton_core::Result;

use crate::keys;

/// Build the job registry. Jobs listed in `scheduler.disabled_jobs` are
/// registered but disabled.
pub fn load_all(container: &Container, settings: &Settings) -> Result<JobRegistry> {
    let users = container.make(&keys::USER_REPOSITORY)?;

    let mut registry = JobRegistry::jobs();
    for job in [
        ScheduledJob::from_job(ExampleJob::new(&settings.app.name)),
        ScheduledJob::from_job(UserStatsJob::new(users)),
    ] {
        let enabled = job.is_enabled() && !settings.scheduler.is_disabled(job.name());
        registry.register(Box::new(job.with_enabled(enabled)));
    }
    Ok(registry)
}
