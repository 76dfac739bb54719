use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{CacheConfig, Settings};
use crate::container::Container;
use crate::drivers::{CacheStore, MemoryCache};
use crate::kernel::error::Result;
use crate::kernel::keys;
use crate::provider::ServiceProvider;
use crate::registry::Named;

/// Binds `cache`.
pub struct CacheServiceProvider {
    config: CacheConfig,
}

impl CacheServiceProvider {
    pub fn new(config: CacheConfig) -> Self {
        Self { config }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.cache.clone())
    }
}

impl Named for CacheServiceProvider {
    fn name(&self) -> &str {
        "cache"
    }

    fn describe(&self) -> String {
        format!("driver={}", self.config.driver)
    }
}

#[async_trait]
impl ServiceProvider for CacheServiceProvider {
    fn register(&self, container: &Container) -> Result<()> {
        super::ensure_driver("cache", &self.config.driver)?;

        let ttl = self.config.default_ttl();
        container.singleton(keys::CACHE, move |_| {
            let cache = match ttl {
                Some(ttl) => MemoryCache::new().with_default_ttl(ttl),
                None => MemoryCache::new(),
            };
            Ok(Arc::new(cache) as Arc<dyn CacheStore>)
        })
    }

    async fn shutdown(&self, container: &Container) -> Result<()> {
        // Never construct the cache just to flush it.
        if let Some(cache) = container.resolved(&keys::CACHE) {
            log::info!("Flushing cache ({} entries)", cache.len());
            cache.flush();
        }
        Ok(())
    }
}
