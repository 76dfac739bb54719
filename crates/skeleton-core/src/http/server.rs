use std::net::SocketAddr;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::kernel::error::{Error, Result};
use crate::kernel::shutdown::within;

/// HTTP transport running on its own task.
///
/// [`spawn`](Self::spawn) returns as soon as the listener is bound. Errors
/// from the serving loop after that point are logged and never reach the
/// caller.
pub struct HttpServer {
    addr: String,
    router: Mutex<Option<Router>>,
    cancel: CancellationToken,
    task: Mutex<Option<JoinHandle<()>>>,
    local_addr: OnceLock<SocketAddr>,
}

impl std::fmt::Debug for HttpServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpServer")
            .field("addr", &self.addr)
            .field("local_addr", &self.local_addr.get())
            .finish()
    }
}

impl HttpServer {
    pub fn new(addr: impl Into<String>, router: Router) -> Self {
        Self {
            addr: addr.into(),
            router: Mutex::new(Some(router)),
            cancel: CancellationToken::new(),
            task: Mutex::new(None),
            local_addr: OnceLock::new(),
        }
    }

    /// Bound address, available after a successful [`spawn`](Self::spawn).
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    /// Bind the listener and start serving in the background.
    pub async fn spawn(&self) -> Result<SocketAddr> {
        let router = self
            .router
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or_else(|| Error::Server {
                message: "server already started".to_string(),
                source: None,
            })?;

        let listener = TcpListener::bind(&self.addr)
            .await
            .map_err(|e| Error::Server {
                message: format!("failed to bind {}", self.addr),
                source: Some(e),
            })?;
        let local_addr = listener.local_addr().map_err(|e| Error::Server {
            message: "failed to read bound address".to_string(),
            source: Some(e),
        })?;
        let _ = self.local_addr.set(local_addr);

        let token = self.cancel.clone();
        let app = router.layer(TraceLayer::new_for_http());
        let handle = tokio::spawn(async move {
            let served = axum::serve(listener, app)
                .with_graceful_shutdown(async move { token.cancelled().await })
                .await;
            match served {
                Ok(()) => log::info!("HTTP server on {} stopped", local_addr),
                Err(e) => log::error!("HTTP server on {} failed: {}", local_addr, e),
            }
        });
        *self.task.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);

        log::info!("HTTP server listening on {}", local_addr);
        Ok(local_addr)
    }

    /// Stop accepting connections and wait up to `timeout` for in-flight
    /// requests to drain. The serving task is aborted on timeout.
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.cancel.cancel();
        let handle = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(handle) = handle else {
            log::debug!("HTTP server was never started");
            return Ok(());
        };

        let abort = handle.abort_handle();
        let drained = within("http server drain", timeout, async move {
            handle.await.map_err(|e| Error::Server {
                message: format!("serving task ended abnormally: {e}"),
                source: None,
            })
        })
        .await;
        if let Err(Error::ShutdownTimeout { .. }) = &drained {
            abort.abort();
        }
        drained
    }
}
