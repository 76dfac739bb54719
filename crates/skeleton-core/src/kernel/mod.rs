//! # Skeleton Kernel
//!
//! The `kernel` module drives an application from configuration to exit.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Application Bootstrapping**: [`Application`](bootstrap::Application)
//!   loads settings, runs provider `register` then `boot`, starts lifecycle
//!   services and serves HTTP or schedules jobs depending on its [`AppMode`].
//! - **Lifecycle States**: [`LifecycleState`] only ever moves one step forward.
//! - **Shutdown**: [`ShutdownHooks`] run in registration order; a failing hook
//!   never prevents the next one from running.
//! - **Error Handling**: kernel-wide [`Error`](error::Error) and `Result`.
pub mod bootstrap;
pub mod component;
pub mod constants;
pub mod error;
pub mod keys;
pub mod lifecycle;
pub mod shutdown;
pub mod signal;

pub use bootstrap::{AppMode, Application};
pub use component::Lifecycle;
pub use error::{Error, Result};
pub use lifecycle::LifecycleState;
pub use shutdown::{HookFailure, ShutdownHooks, ShutdownReport};

#[cfg(test)]
mod tests;
