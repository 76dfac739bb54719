use std::sync::Arc;

use async_trait::async_trait;

use crate::kernel::error::Result;

/// Start/stop contract for long-lived services held by the container
/// (queue workers, schedulers).
#[async_trait]
pub trait Lifecycle: Send + Sync {
    fn name(&self) -> &str;
    async fn start(&self) -> Result<()>;
    async fn stop(&self) -> Result<()>;
}

/// Adapts an `Arc<T>` of any lifecycle-aware service, including trait objects
/// such as `dyn Scheduler`, into an `Arc<dyn Lifecycle>`.
pub(crate) struct Managed<T: ?Sized>(pub(crate) Arc<T>);

#[async_trait]
impl<T> Lifecycle for Managed<T>
where
    T: ?Sized + Lifecycle,
{
    fn name(&self) -> &str {
        self.0.name()
    }

    async fn start(&self) -> Result<()> {
        self.0.start().await
    }

    async fn stop(&self) -> Result<()> {
        self.0.stop().await
    }
}
