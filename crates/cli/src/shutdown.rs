use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Turns the first SIGINT or SIGTERM into a cancellation of the run. The
/// engine checks the token between datasets, so results already written
/// stay valid.
pub struct ShutdownCoordinator {
    cancel: CancellationToken,
    requested: Arc<AtomicBool>,
}

impl ShutdownCoordinator {
    /// Spawns the signal listener and returns the coordinator.
    pub fn install() -> Self {
        let cancel = CancellationToken::new();
        let requested = Arc::new(AtomicBool::new(false));

        let token = cancel.clone();
        let flag = requested.clone();
        tokio::spawn(async move {
            wait_for_signal().await;
            info!("Shutdown signal received, finishing the current dataset then stopping");
            flag.store(true, Ordering::SeqCst);
            token.cancel();
        });

        ShutdownCoordinator { cancel, requested }
    }

    pub fn is_shutdown_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

async fn wait_for_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
