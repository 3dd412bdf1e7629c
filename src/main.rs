use std::sync::Arc;

use devserve::config::{Config, ServerState};
use devserve::error::ServerError;
use devserve::logger;
use devserve::server::{self, ReadyHook, ShutdownSignal};

fn main() {
    // Startup failures reach the developer as the Display message, not a
    // Debug dump of the error struct.
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load().map_err(ServerError::Config)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(ServerState::new(cfg)?);
    let addr = state.config.socket_addr()?;

    let listener = server::create_listener(addr)
        .map_err(|source| ServerError::Bind { addr, source })?;

    let shutdown = ShutdownSignal::new();
    shutdown.install();

    logger::log_server_start(&state.config.url(), &state.root);

    let ready: Option<ReadyHook> = if state.config.browser.open {
        Some(Box::new(launch_browser))
    } else {
        None
    };

    server::serve(listener, state, shutdown, ready).await?;
    Ok(())
}

/// Best-effort browser launch; a failure only costs a log line.
fn launch_browser(url: &str) {
    if let Err(e) = open::that_detached(url) {
        logger::log_warning(&format!(
            "Failed to open browser: {e}. Please navigate to {url} manually."
        ));
    }
}
