use std::sync::Arc;

use async_trait::async_trait;
use skeleton_core::container::Container;
use skeleton_core::kernel::keys as core_keys;
use skeleton_core::provider::ServiceProvider;
use skeleton_core::registry::{Named, Registry};
use skeleton_core::Result;

use crate::keys;
use crate::repositories::{DatabaseUserRepository, UserRepository};

/// Binds every repository. Add new repositories to [`repositories`].
#[derive(Default)]
pub struct RepositoryServiceProvider;

impl RepositoryServiceProvider {
    pub fn new() -> Self {
        Self
    }
}

fn repositories() -> Registry {
    let mut registry: Registry = Registry::new("repository");
    registry.component(keys::USER_REPOSITORY, |container| {
        let db = container.make(&core_keys::DATABASE)?;
        Ok(Arc::new(DatabaseUserRepository::new(db)) as Arc<dyn UserRepository>)
    });
    registry
}

impl Named for RepositoryServiceProvider {
    fn name(&self) -> &str {
        "repository"
    }
}

#[async_trait]
impl ServiceProvider for RepositoryServiceProvider {
    fn register(&self, container: &Container) -> Result<()> {
        repositories().register_all(container)
    }
}
