//! # Skeleton Scheduler
//!
//! Scheduled jobs and the scheduler contract they are handed to.
//!
//! - [`ScheduledJob`] is a name, a cron expression, an enabled flag and a
//!   zero-argument handler; [`Job`] lets stateful job types produce one.
//! - [`JobRegistry`] collects jobs and schedules the enabled ones in
//!   registration order.
//! - [`Scheduler`] is the collaborator contract; [`CronScheduler`] implements
//!   it on `tokio-cron-scheduler`.
pub mod cron;
pub mod job;
pub mod registry;

pub use cron::CronScheduler;
pub use job::{Job, JobHandler, ScheduledJob};
pub use registry::JobRegistry;

use async_trait::async_trait;

use crate::kernel::component::Lifecycle;
use crate::kernel::error::Result;

/// Accepts jobs and runs them on their cron schedule once started.
#[async_trait]
pub trait Scheduler: Lifecycle {
    async fn schedule(&self, cron: &str, name: &str, handler: JobHandler) -> Result<()>;
}

#[cfg(test)]
mod tests;
