use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use skeleton_core::container::Container;
use skeleton_core::kernel::keys as core_keys;
use skeleton_core::provider::ServiceProvider;
use skeleton_core::registry::{Named, Registry};
use skeleton_core::Result;

use crate::keys;
use crate::services::{DefaultUserService, UserService, WELCOME_EMAIL_JOB};

/// Binds every domain service and the queue handlers they rely on.
#[derive(Default)]
pub struct ServiceLayerProvider;

impl ServiceLayerProvider {
    pub fn new() -> Self {
        Self
    }
}

fn services() -> Registry {
    let mut registry: Registry = Registry::new("service");
    registry.component(keys::USER_SERVICE, |container| {
        let service = DefaultUserService::new(
            container.make(&keys::USER_REPOSITORY)?,
            container.make(&core_keys::CACHE)?,
            container.make(&core_keys::QUEUE)?,
        );
        Ok(Arc::new(service) as Arc<dyn UserService>)
    });
    registry
}

fn send_welcome_email(payload: Value) -> Result<()> {
    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .ok_or("welcome email payload has no address")?;
    log::info!("Sending welcome email to {}", email);
    Ok(())
}

impl Named for ServiceLayerProvider {
    fn name(&self) -> &str {
        "service"
    }
}

#[async_trait]
impl ServiceProvider for ServiceLayerProvider {
    fn register(&self, container: &Container) -> Result<()> {
        services().register_all(container)
    }

    async fn boot(&self, container: &Container) -> Result<()> {
        let queue = container.make(&core_keys::QUEUE)?;
        queue.register_handler(WELCOME_EMAIL_JOB, Arc::new(send_welcome_email));
        Ok(())
    }
}
