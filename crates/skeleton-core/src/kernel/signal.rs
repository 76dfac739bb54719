/// Resolve once the process receives Ctrl-C or, on Unix, SIGTERM.
///
/// If a signal listener cannot be installed it is logged and that branch
/// never fires; the other one still does.
pub async fn wait_for_termination() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = interrupt => log::info!("Received interrupt signal"),
        _ = terminate => log::info!("Received terminate signal"),
    }
}
