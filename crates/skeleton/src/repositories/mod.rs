//! Data access over the `database` binding.
mod user;

pub use user::{DatabaseUserRepository, UserRepository};
