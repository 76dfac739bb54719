use std::sync::Arc;

use async_trait::async_trait;

use crate::container::Container;
use crate::kernel::error::Result;
use crate::kernel::keys;
use crate::provider::ServiceProvider;
use crate::registry::Named;
use crate::scheduler::{CronScheduler, Scheduler};

/// Binds `scheduler` as a lifecycle service backed by [`CronScheduler`].
#[derive(Default)]
pub struct SchedulerServiceProvider;

impl SchedulerServiceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Named for SchedulerServiceProvider {
    fn name(&self) -> &str {
        "scheduler"
    }
}

#[async_trait]
impl ServiceProvider for SchedulerServiceProvider {
    fn register(&self, container: &Container) -> Result<()> {
        container.service(keys::SCHEDULER, |_| {
            Ok(Arc::new(CronScheduler::new()) as Arc<dyn Scheduler>)
        })
    }
}
