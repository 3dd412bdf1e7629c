//! Connection handling module
//!
//! Accepts a single TCP connection and serves it as an HTTP/1.1 connection
//! in a spawned task, tracked by the active connection counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;

use crate::config::ServerState;
use crate::handler;
use crate::logger;
use crate::server::signal::ShutdownSignal;

/// Accept a connection and serve it in a background task.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<ServerState>,
    conn_counter: &Arc<AtomicUsize>,
    shutdown: &ShutdownSignal,
) {
    conn_counter.fetch_add(1, Ordering::SeqCst);

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(
        stream,
        Arc::clone(state),
        Arc::clone(conn_counter),
        shutdown.clone(),
    );
}

/// Serve a single connection until it closes or shutdown is requested.
///
/// On shutdown the connection is asked to finish its in-flight response and
/// stop keep-alive, so draining never waits on an idle browser connection.
fn handle_connection(
    stream: tokio::net::TcpStream,
    state: Arc<ServerState>,
    conn_counter: Arc<AtomicUsize>,
    shutdown: ShutdownSignal,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let conn = http1::Builder::new().serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&state);
                handler::handle_request(req, state)
            }),
        );
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => {
                if let Err(err) = result {
                    logger::log_connection_error(&err);
                }
            }
            () = shutdown.notified() => {
                conn.as_mut().graceful_shutdown();
                if let Err(err) = conn.as_mut().await {
                    logger::log_connection_error(&err);
                }
            }
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
