use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{DatabaseConfig, Settings};
use crate::container::Container;
use crate::drivers::{Database, MemoryDatabase};
use crate::kernel::error::Result;
use crate::kernel::keys;
use crate::provider::ServiceProvider;
use crate::registry::Named;

/// Binds `database`. The connection is opened on first resolution, never
/// during boot, so an unavailable database does not block startup.
pub struct DatabaseServiceProvider {
    config: DatabaseConfig,
}

impl DatabaseServiceProvider {
    pub fn new(config: DatabaseConfig) -> Self {
        Self { config }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.database.clone())
    }
}

impl Named for DatabaseServiceProvider {
    fn name(&self) -> &str {
        "database"
    }

    fn describe(&self) -> String {
        format!("driver={}", self.config.driver)
    }
}

#[async_trait]
impl ServiceProvider for DatabaseServiceProvider {
    fn register(&self, container: &Container) -> Result<()> {
        super::ensure_driver("database", &self.config.driver)?;

        let url = self.config.url.clone();
        container.singleton(keys::DATABASE, move |_| {
            match &url {
                Some(url) => log::info!("Opening memory database (url '{}' ignored)", url),
                None => log::info!("Opening memory database"),
            }
            Ok(Arc::new(MemoryDatabase::new()) as Arc<dyn Database>)
        })
    }
}
