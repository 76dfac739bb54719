//! The skeleton application: a user CRUD API and scheduled jobs wired
//! together with `skeleton-core` providers.
pub mod bootstrap;
pub mod http;
pub mod jobs;
pub mod keys;
pub mod models;
pub mod providers;
pub mod repositories;
pub mod services;

pub use bootstrap::{application, providers};
