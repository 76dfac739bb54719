use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{QueueConfig, Settings};
use crate::container::Container;
use crate::drivers::{MemoryQueue, Queue};
use crate::kernel::error::Result;
use crate::kernel::keys;
use crate::provider::ServiceProvider;
use crate::registry::Named;

/// Binds `queue` as a lifecycle service: its worker starts with the other
/// services and drains on shutdown.
pub struct QueueServiceProvider {
    config: QueueConfig,
}

impl QueueServiceProvider {
    pub fn new(config: QueueConfig) -> Self {
        Self { config }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.queue.clone())
    }
}

impl Named for QueueServiceProvider {
    fn name(&self) -> &str {
        "queue"
    }

    fn describe(&self) -> String {
        format!(
            "driver={}, capacity={}",
            self.config.driver, self.config.capacity
        )
    }
}

#[async_trait]
impl ServiceProvider for QueueServiceProvider {
    fn register(&self, container: &Container) -> Result<()> {
        super::ensure_driver("queue", &self.config.driver)?;

        let capacity = self.config.capacity;
        let drain_timeout = self.config.drain_timeout();
        container.service(keys::QUEUE, move |_| {
            Ok(Arc::new(MemoryQueue::new(capacity, drain_timeout)) as Arc<dyn Queue>)
        })
    }
}
