//! Accept loop module
//!
//! Runs the server until a shutdown signal arrives, then lets in-flight
//! connections finish before returning.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::config::ServerState;
use crate::logger;
use crate::server::connection::accept_connection;
use crate::server::signal::ShutdownSignal;

/// Callback invoked once with the server URL after the listener is live.
/// The production hook opens a browser; tests pass `None`.
pub type ReadyHook = Box<dyn FnOnce(&str) + Send>;

/// Run the accept loop until shutdown.
///
/// Returns `Ok(())` on an interrupt-triggered shutdown; this is the normal
/// way the server exits.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ServerState>,
    shutdown: ShutdownSignal,
    ready: Option<ReadyHook>,
) -> std::io::Result<()> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    if let Some(hook) = ready {
        let url = format!("http://localhost:{}/", listener.local_addr()?.port());
        hook(&url);
    }

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &shutdown,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                break;
            }
        }
    }

    // Stop accepting, then wait for in-flight connections to drain.
    drop(listener);
    while active_connections.load(Ordering::SeqCst) > 0 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    logger::log_shutdown();
    Ok(())
}
