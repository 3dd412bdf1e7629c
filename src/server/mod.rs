//! Server module
//!
//! Listener construction, signal handling, and the accept loop.

pub mod connection;
pub mod listener;
pub mod run;
pub mod signal;

// Re-export commonly used items
pub use listener::create_listener;
pub use run::{serve, ReadyHook};
pub use signal::ShutdownSignal;
