//! Graceful shutdown handling
//!
//! Listens for SIGTERM / SIGINT and lets the HTTP server drain in-flight
//! requests. A booking that already entered its commit step finishes (or
//! reports a persistence failure) before the process exits.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Shutdown signal that can be cloned and shared across tasks
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<()>,
    triggered: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            sender,
            triggered: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }

    pub fn trigger(&self) {
        if !self.triggered.swap(true, Ordering::SeqCst) {
            info!("Shutdown signal triggered");
            let _ = self.sender.send(());
        }
    }

    /// Resolves once shutdown has been triggered, including when it was
    /// triggered before this call.
    pub async fn wait(&self) {
        let mut rx = self.sender.subscribe();
        if self.is_triggered() {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Listen for SIGTERM / SIGINT and trigger `shutdown`.
pub async fn listen_for_shutdown_signals(shutdown: ShutdownSignal) {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    error!(error = %e, "Failed to install signal handlers");
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            return;
        }
        info!("Received Ctrl+C");
    }

    shutdown.trigger();
}

/// Owns the process-wide shutdown signal and the cleanup deadline.
pub struct ShutdownCoordinator {
    signal: ShutdownSignal,
    timeout: Duration,
}

impl ShutdownCoordinator {
    pub fn new(timeout_secs: u64) -> Self {
        Self {
            signal: ShutdownSignal::new(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    pub fn signal(&self) -> ShutdownSignal {
        self.signal.clone()
    }

    /// Start listening for OS signals in the background
    pub fn start_signal_listener(&self) {
        let signal = self.signal.clone();
        tokio::spawn(async move {
            listen_for_shutdown_signals(signal).await;
        });
    }

    /// Run `cleanup` bounded by the shutdown timeout.
    /// Returns `false` if the deadline elapsed first.
    pub async fn shutdown_with_cleanup<F, Fut>(&self, cleanup: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        info!(timeout_secs = self.timeout.as_secs(), "Starting graceful shutdown");
        match tokio::time::timeout(self.timeout, cleanup()).await {
            Ok(()) => {
                info!("Graceful shutdown completed");
                true
            }
            Err(_) => {
                warn!(timeout_secs = self.timeout.as_secs(), "Graceful shutdown timed out");
                false
            }
        }
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new(10)
    }
}
