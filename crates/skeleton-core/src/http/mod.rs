//! HTTP transport: route groups contributed by providers, health endpoints
//! and a background server with bounded graceful shutdown.
mod health;
mod routes;
mod server;

pub use health::{Readiness, health_routes};
pub use routes::RouteTable;
pub use server::HttpServer;

#[cfg(test)]
mod tests;
