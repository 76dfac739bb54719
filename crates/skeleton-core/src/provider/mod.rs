//! # Skeleton Service Providers
//!
//! A [`ServiceProvider`] wires one subsystem into the [`Container`] in two
//! phases. `register` only binds factories; `boot` runs after every provider
//! has registered, so it may resolve anything bound by an earlier provider.
//!
//! Providers live in a [`ProviderRegistry`], whose order is the dependency
//! order (infrastructure before application code). The registry does not
//! reorder anything.
use async_trait::async_trait;

use crate::container::Container;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::registry::{Named, Registry};

#[async_trait]
pub trait ServiceProvider: Named + Send + Sync {
    /// Bind factories. Must not construct anything expensive.
    fn register(&self, container: &Container) -> Result<()>;

    async fn boot(&self, _container: &Container) -> Result<()> {
        Ok(())
    }

    /// Release resources during shutdown. Should only touch bindings that
    /// were actually constructed (see [`Container::resolved`]).
    async fn shutdown(&self, _container: &Container) -> Result<()> {
        Ok(())
    }
}

/// Ordered list of service providers.
pub type ProviderRegistry = Registry<dyn ServiceProvider>;

impl Registry<dyn ServiceProvider> {
    pub fn providers() -> Self {
        Registry::new("provider")
    }

    /// Call `register` on every provider in order, stopping at the first
    /// failure.
    pub fn register_providers(&self, container: &Container) -> Result<()> {
        for provider in self.iter() {
            log::debug!("Registering provider: {}", provider.name());
            provider
                .register(container)
                .map_err(|e| Error::ProviderRegistration {
                    provider: provider.name().to_string(),
                    source: Box::new(e),
                })?;
        }
        log::info!("Registered {} provider(s)", self.count());
        Ok(())
    }

    /// Call `boot` on every provider in order, stopping at the first
    /// failure.
    pub async fn boot_providers(&self, container: &Container) -> Result<()> {
        for provider in self.iter() {
            log::debug!("Booting provider: {}", provider.name());
            provider
                .boot(container)
                .await
                .map_err(|e| Error::ProviderBoot {
                    provider: provider.name().to_string(),
                    source: Box::new(e),
                })?;
        }
        log::info!("Booted {} provider(s)", self.count());
        Ok(())
    }

    /// Call `shutdown` on every provider in reverse order. Every provider is
    /// visited; failures are logged and folded into one error.
    pub async fn shutdown_providers(&self, container: &Container) -> Result<()> {
        let mut failures = Vec::new();
        for provider in self.iter().rev() {
            if let Err(e) = provider.shutdown(container).await {
                log::error!("Error shutting down provider {}: {}", provider.name(), e);
                failures.push((provider.name().to_string(), e));
            }
        }
        Error::collect(
            KernelLifecyclePhase::Shutdown,
            "provider(s) failed to shut down",
            failures,
        )
    }
}
