//! Infrastructure service providers. Each binds one driver-backed service
//! under its key in [`keys`](crate::kernel::keys), choosing the driver from
//! [`Settings`](crate::config::Settings).
mod cache;
mod database;
mod filesystem;
mod queue;
mod scheduler;

pub use cache::CacheServiceProvider;
pub use database::DatabaseServiceProvider;
pub use filesystem::FilesystemServiceProvider;
pub use queue::QueueServiceProvider;
pub use scheduler::SchedulerServiceProvider;

use crate::drivers::MEMORY_DRIVER;
use crate::kernel::error::{Error, Result};

fn ensure_driver(service: &'static str, driver: &str) -> Result<()> {
    if driver == MEMORY_DRIVER {
        Ok(())
    } else {
        Err(Error::UnsupportedDriver {
            service,
            driver: driver.to_string(),
        })
    }
}

#[cfg(test)]
mod tests;
