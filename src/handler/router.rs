//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, dispatch to
//! the static file service, and the unconditional no-cache policy applied
//! to every response on the way out.

use std::convert::Infallible;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};

use crate::config::ServerState;
use crate::handler::static_files;
use crate::http;
use crate::logger;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling.
///
/// Generic over the body type: the server hands in `hyper::body::Incoming`,
/// tests can use any body since the request body is never read.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<ServerState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let is_head = method == Method::HEAD;

    let mut response = match check_http_method(&method) {
        Some(resp) => resp,
        None => {
            let ctx = RequestContext {
                path: &path,
                is_head,
            };
            static_files::serve_path(&ctx, &state).await
        }
    };

    // Every response gets the cache-busting headers, whatever its status.
    http::disable_caching(&mut response);

    if state.config.logging.access_log {
        logger::log_access(&method, &path, response.status().as_u16(), body_len(&response));
    }

    Ok(response)
}

/// Check HTTP method and return an early response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD => None,
        &Method::OPTIONS => Some(http::build_options_response()),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

fn body_len(response: &Response<Full<Bytes>>) -> usize {
    response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}
