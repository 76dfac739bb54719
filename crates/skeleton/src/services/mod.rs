//! Business logic over the repositories, cache and queue.
mod user;

pub use user::{DefaultUserService, UserPage, UserService, WELCOME_EMAIL_JOB};
