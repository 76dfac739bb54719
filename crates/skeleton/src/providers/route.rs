use async_trait::async_trait;
use skeleton_core::container::Container;
use skeleton_core::http::health_routes;
use skeleton_core::kernel::keys as core_keys;
use skeleton_core::provider::ServiceProvider;
use skeleton_core::registry::Named;
use skeleton_core::Result;

use crate::http::{home_routes, user_routes};
use crate::keys;

/// Contributes the application's route groups.
///
/// Route groups are added during boot, after every binding exists, and
/// resolve the user service at that point.
#[derive(Default)]
pub struct RouteServiceProvider;

impl RouteServiceProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Named for RouteServiceProvider {
    fn name(&self) -> &str {
        "route"
    }
}

#[async_trait]
impl ServiceProvider for RouteServiceProvider {
    fn register(&self, _container: &Container) -> Result<()> {
        Ok(())
    }

    async fn boot(&self, container: &Container) -> Result<()> {
        let settings = container.make(&core_keys::CONFIG)?;
        let routes = container.make(&core_keys::ROUTES)?;
        let readiness = container.make(&core_keys::READINESS)?;

        routes.add("home", home_routes(&settings.app.name));
        routes.add("health", health_routes(&settings.app.name, readiness));
        routes.add("users", user_routes(container.make(&keys::USER_SERVICE)?));
        Ok(())
    }
}
