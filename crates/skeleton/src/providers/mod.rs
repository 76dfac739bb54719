//! Application-layer service providers.
mod repository;
mod route;
mod service;

pub use repository::RepositoryServiceProvider;
pub use route::RouteServiceProvider;
pub use service::ServiceLayerProvider;

#[cfg(test)]
mod tests;
