//! Signal handling module
//!
//! An interrupt (Ctrl+C) or SIGTERM is the only way this server stops, and
//! it is the normal exit path: the accept loop observes the signal, drains
//! in-flight connections, and returns cleanly.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Shutdown signal shared between the signal task, the accept loop, and
/// per-connection tasks.
#[derive(Clone, Default)]
pub struct ShutdownSignal {
    notify: Arc<Notify>,
    requested: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark shutdown as requested and wake every waiter.
    pub fn trigger(&self) {
        self.requested.store(true, Ordering::SeqCst);
        self.notify.notify_waiters();
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Wait until shutdown is requested. Registers interest before checking
    /// the flag so a trigger between the two cannot be lost.
    pub async fn notified(&self) {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_requested() {
            return;
        }
        notified.await;
    }

    /// Spawn the background task that turns process signals into a shutdown
    /// request. SIGINT (Ctrl+C) and SIGTERM both mean graceful shutdown.
    #[cfg(unix)]
    pub fn install(&self) {
        use tokio::signal::unix::{signal, SignalKind};

        let shutdown = self.clone();
        tokio::spawn(async move {
            let mut sigint = match signal(SignalKind::interrupt()) {
                Ok(s) => s,
                Err(e) => {
                    crate::logger::log_error(&format!("Failed to register SIGINT handler: {e}"));
                    return;
                }
            };
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    crate::logger::log_error(&format!("Failed to register SIGTERM handler: {e}"));
                    return;
                }
            };

            tokio::select! {
                _ = sigint.recv() => {}
                _ = sigterm.recv() => {}
            }
            shutdown.trigger();
        });
    }

    /// Windows fallback - only handles Ctrl+C
    #[cfg(not(unix))]
    pub fn install(&self) {
        let shutdown = self.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.trigger();
            }
        });
    }
}
