//! devserve — local development static file server.
//!
//! Serves a directory tree over HTTP with cache-busting headers on every
//! response, so edits show up on the next reload. Development use only.

pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
