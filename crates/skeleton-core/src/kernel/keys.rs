//! Container keys for the bindings the kernel and the infrastructure
//! providers own.
use crate::config::Settings;
use crate::container::Key;
use crate::drivers::{CacheStore, Database, Filesystem, Queue};
use crate::http::{Readiness, RouteTable};
use crate::logging::LogHandle;
use crate::scheduler::Scheduler;

pub const CONFIG: Key<Settings> = Key::new("config");
pub const LOGGER: Key<LogHandle> = Key::new("logger");
pub const ROUTES: Key<RouteTable> = Key::new("routes");
pub const READINESS: Key<Readiness> = Key::new("readiness");
pub const CACHE: Key<dyn CacheStore> = Key::new("cache");
pub const QUEUE: Key<dyn Queue> = Key::new("queue");
pub const DATABASE: Key<dyn Database> = Key::new("database");
pub const FILESYSTEM: Key<dyn Filesystem> = Key::new("filesystem");
pub const SCHEDULER: Key<dyn Scheduler> = Key::new("scheduler");
