//! HTTP protocol layer module
//!
//! Protocol-level helpers shared by the request handlers: MIME lookup,
//! response builders and the no-cache response policy.

pub mod cache;
pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use cache::disable_caching;
pub use response::{
    build_404_response, build_405_response, build_file_response, build_html_response,
    build_options_response,
};
