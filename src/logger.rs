//! Logger module
//!
//! Console logging for the development server: startup banner, access
//! lines, warnings/errors, and the shutdown confirmation.

use std::net::SocketAddr;
use std::path::Path;

use chrono::Local;
use hyper::Method;

pub fn log_server_start(url: &str, root: &Path) {
    println!("======================================");
    println!("Development server running at: {url}");
    println!("Serving files from: {}", root.display());
    println!("Process ID: {}", std::process::id());
    println!();
    println!("Press Ctrl+C to stop the server");
    println!("======================================\n");
}

pub fn log_shutdown() {
    println!("\nServer stopped successfully");
}

/// One access line per handled request
pub fn log_access(method: &Method, path: &str, status: u16, body_bytes: usize) {
    println!(
        "[{}] {method} {path} - {status} ({body_bytes} bytes)",
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}
