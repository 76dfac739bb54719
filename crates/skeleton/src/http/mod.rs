//! HTTP routes contributed by the application.
mod error;
mod home;
mod users;

pub use error::ApiError;
pub use home::home_routes;
pub use users::user_routes;
