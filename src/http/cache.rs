//! Cache-busting response policy
//!
//! A development server must never let the browser cache anything, or edits
//! stop showing up on reload. Every response, whatever its status, passes
//! through [`disable_caching`] before it is written to the client.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CACHE_CONTROL, EXPIRES};
use hyper::Response;

/// Exact `Cache-Control` value attached to every response.
pub const CACHE_CONTROL_VALUE: &str = "no-store, no-cache, must-revalidate";

/// Exact `Expires` value attached to every response.
pub const EXPIRES_VALUE: &str = "0";

/// Attach the cache-busting headers to a response, replacing any cache
/// headers a builder may have set.
pub fn disable_caching(response: &mut Response<Full<Bytes>>) {
    let headers = response.headers_mut();
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(CACHE_CONTROL_VALUE));
    headers.insert(EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::response;

    fn header<'a>(resp: &'a Response<Full<Bytes>>, name: &str) -> Option<&'a str> {
        resp.headers().get(name).and_then(|v| v.to_str().ok())
    }

    #[test]
    fn test_headers_inserted() {
        let mut resp = response::build_404_response();
        disable_caching(&mut resp);
        assert_eq!(
            header(&resp, "cache-control"),
            Some("no-store, no-cache, must-revalidate")
        );
        assert_eq!(header(&resp, "expires"), Some("0"));
    }

    #[test]
    fn test_existing_cache_headers_replaced() {
        let mut resp = Response::builder()
            .status(200)
            .header("Cache-Control", "public, max-age=3600")
            .body(Full::new(Bytes::new()))
            .unwrap();
        disable_caching(&mut resp);
        assert_eq!(header(&resp, "cache-control"), Some(CACHE_CONTROL_VALUE));
        assert_eq!(resp.headers().get_all("cache-control").iter().count(), 1);
    }
}
