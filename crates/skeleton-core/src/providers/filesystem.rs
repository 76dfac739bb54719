use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{FilesystemConfig, Settings};
use crate::container::Container;
use crate::drivers::{Filesystem, LOCAL_DRIVER, LocalFilesystem};
use crate::kernel::error::{Error, Result};
use crate::kernel::keys;
use crate::provider::ServiceProvider;
use crate::registry::Named;

/// Binds `filesystem` to a local directory. Nothing touches the disk until
/// the first write.
pub struct FilesystemServiceProvider {
    config: FilesystemConfig,
}

impl FilesystemServiceProvider {
    pub fn new(config: FilesystemConfig) -> Self {
        Self { config }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.filesystem.clone())
    }
}

impl Named for FilesystemServiceProvider {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn describe(&self) -> String {
        format!(
            "driver={} root={}",
            self.config.driver,
            self.config.root.display()
        )
    }
}

#[async_trait]
impl ServiceProvider for FilesystemServiceProvider {
    fn register(&self, container: &Container) -> Result<()> {
        if self.config.driver != LOCAL_DRIVER {
            return Err(Error::UnsupportedDriver {
                service: "filesystem",
                driver: self.config.driver.clone(),
            });
        }

        let root = self.config.root.clone();
        container.singleton(keys::FILESYSTEM, move |_| {
            log::info!("Using local filesystem at {}", root.display());
            Ok(Arc::new(LocalFilesystem::new(root.clone())) as Arc<dyn Filesystem>)
        })
    }
}
