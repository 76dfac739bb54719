pub mod config;
pub mod container;
pub mod drivers;
pub mod http;
pub mod kernel;
pub mod logging;
pub mod provider;
pub mod providers;
pub mod registry;
pub mod scheduler;

// Re-export the types most applications touch.
pub use config::Settings;
pub use container::{Container, Key};
pub use kernel::error::{Error as KernelError, Result};
pub use kernel::{AppMode, Application, Lifecycle, LifecycleState};
pub use provider::{ProviderRegistry, ServiceProvider};
pub use registry::{Component, Named, Registrable, Registry};
pub use scheduler::{Job, JobRegistry, ScheduledJob, Scheduler};
