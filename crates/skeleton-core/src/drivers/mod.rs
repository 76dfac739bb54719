//! # Skeleton Drivers
//!
//! Backends behind the `cache`, `queue`, `database` and `filesystem`
//! bindings. The first three ship an in-memory `memory` driver, the
//! filesystem a `local` one; the traits are the seam for others.
pub mod cache;
pub mod database;
pub mod filesystem;
pub mod queue;

pub use cache::{CacheExt, CacheStore, MemoryCache};
pub use database::{Database, MemoryDatabase};
pub use filesystem::{Filesystem, LocalFilesystem};
pub use queue::{MemoryQueue, Queue, QueueHandler};

/// Name of the in-memory driver for every service.
pub const MEMORY_DRIVER: &str = "memory";

/// Name of the local-directory filesystem driver.
pub const LOCAL_DRIVER: &str = "local";

#[cfg(test)]
mod tests;
