//! Static file serving module
//!
//! Maps a request path onto the document root and answers with the file's
//! bytes, a directory index, a generated listing, or 404. All resolution
//! goes through the canonical root so nothing outside it can be served.

use std::path::{Path, PathBuf};

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use tokio::fs;

use crate::config::ServerState;
use crate::handler::router::RequestContext;
use crate::http::{self, mime};
use crate::logger;

/// Outcome of resolving a URL path against the document root
#[derive(Debug)]
pub enum Resolved {
    File(PathBuf),
    Directory(PathBuf),
    NotFound,
    /// Resolution escaped the root (symlink pointing outside, etc.)
    Blocked,
}

/// Resolve a URL path against the canonical root directory.
///
/// The path is percent-decoded before joining, so encoded names (spaces
/// and the like) reach the file system as written there. The joined path
/// is then canonicalized and required to stay under the root; that check,
/// not any rewriting of the URL, is what keeps `..` chains and symlinks
/// from escaping.
pub fn resolve_path(root: &Path, url_path: &str) -> Resolved {
    let Ok(decoded) = urlencoding::decode(url_path) else {
        // Not valid UTF-8 after decoding; no file can match.
        return Resolved::NotFound;
    };
    let joined = root.join(decoded.trim_start_matches('/'));

    let Ok(canonical) = joined.canonicalize() else {
        return Resolved::NotFound;
    };
    if !canonical.starts_with(root) {
        return Resolved::Blocked;
    }

    if canonical.is_dir() {
        Resolved::Directory(canonical)
    } else if canonical.is_file() {
        Resolved::File(canonical)
    } else {
        Resolved::NotFound
    }
}

/// Serve the request path from the document root
pub async fn serve_path(ctx: &RequestContext<'_>, state: &ServerState) -> Response<Full<Bytes>> {
    match resolve_path(&state.root, ctx.path) {
        Resolved::File(file) => serve_file(ctx, &file).await,
        Resolved::Directory(dir) => serve_dir(ctx, state, &dir).await,
        Resolved::NotFound => http::build_404_response(),
        Resolved::Blocked => {
            logger::log_warning(&format!("Path traversal attempt blocked: {}", ctx.path));
            http::build_404_response()
        }
    }
}

async fn serve_file(ctx: &RequestContext<'_>, file: &Path) -> Response<Full<Bytes>> {
    match fs::read(file).await {
        Ok(content) => {
            let content_type = mime::content_type(file.extension().and_then(|e| e.to_str()));
            http::build_file_response(content, content_type, ctx.is_head)
        }
        Err(e) => {
            logger::log_error(&format!("Failed to read file '{}': {}", file.display(), e));
            http::build_404_response()
        }
    }
}

async fn serve_dir(
    ctx: &RequestContext<'_>,
    state: &ServerState,
    dir: &Path,
) -> Response<Full<Bytes>> {
    // Relative links in index pages and listings only work when the
    // directory URL ends with a slash, so redirect first.
    if !ctx.path.ends_with('/') {
        return http::response::build_redirect_response(&format!("{}/", ctx.path));
    }

    let index = dir.join(&state.config.root.index_file);
    if index.is_file() {
        return serve_file(ctx, &index).await;
    }

    match render_listing(ctx.path, dir).await {
        Some(html) => http::build_html_response(html, ctx.is_head),
        None => http::build_404_response(),
    }
}

/// Generate an HTML listing of a directory's entries, sorted by name with
/// directories marked by a trailing slash. Hrefs are percent-encoded,
/// display names HTML-escaped.
async fn render_listing(url_path: &str, dir: &Path) -> Option<String> {
    let mut read_dir = fs::read_dir(dir).await.ok()?;
    let mut entries: Vec<(String, bool)> = Vec::new();

    while let Ok(Some(entry)) = read_dir.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
        entries.push((name, is_dir));
    }
    entries.sort();

    let title = format!("Directory listing for {}", escape_html(url_path));
    let mut items = String::new();
    if url_path != "/" {
        items.push_str("<li><a href=\"../\">../</a></li>\n");
    }
    for (name, is_dir) in &entries {
        let slash = if *is_dir { "/" } else { "" };
        let href = urlencoding::encode(name);
        let display = escape_html(name);
        items.push_str(&format!(
            "<li><a href=\"{href}{slash}\">{display}{slash}</a></li>\n"
        ));
    }

    Some(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
<hr>
<ul>
{items}</ul>
<hr>
</body>
</html>
"#
    ))
}

/// Minimal HTML escaping for file names appearing in listings
fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;

    fn make_root() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        std_fs::write(tmp.path().join("page.html"), "<h1>hi</h1>").unwrap();
        std_fs::create_dir(tmp.path().join("assets")).unwrap();
        std_fs::write(tmp.path().join("assets/app.js"), "console.log(1)").unwrap();
        tmp
    }

    #[test]
    fn test_resolve_existing_file() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();
        assert!(matches!(
            resolve_path(&root, "/page.html"),
            Resolved::File(_)
        ));
        assert!(matches!(
            resolve_path(&root, "/assets/app.js"),
            Resolved::File(_)
        ));
    }

    #[test]
    fn test_resolve_directory_and_root() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();
        assert!(matches!(resolve_path(&root, "/"), Resolved::Directory(_)));
        assert!(matches!(
            resolve_path(&root, "/assets/"),
            Resolved::Directory(_)
        ));
    }

    #[test]
    fn test_resolve_missing() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();
        assert!(matches!(
            resolve_path(&root, "/nope.txt"),
            Resolved::NotFound
        ));
    }

    #[test]
    fn test_dotdot_cannot_escape() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();
        match resolve_path(&root, "/../../etc/passwd") {
            Resolved::NotFound | Resolved::Blocked => {}
            other => panic!("traversal escaped the root: {other:?}"),
        }
    }

    #[test]
    fn test_dotdot_escape_to_existing_file_blocked() {
        // Root is a subdirectory; the target really exists one level up, so
        // only the canonicalize-under-root check stands in the way.
        let tmp = tempfile::tempdir().unwrap();
        std_fs::write(tmp.path().join("secret.txt"), "secret").unwrap();
        let root_dir = tmp.path().join("public");
        std_fs::create_dir(&root_dir).unwrap();
        let root = root_dir.canonicalize().unwrap();

        assert!(matches!(
            resolve_path(&root, "/../secret.txt"),
            Resolved::Blocked
        ));
        // Same escape spelled with percent-encoded dots
        assert!(matches!(
            resolve_path(&root, "/%2e%2e/secret.txt"),
            Resolved::Blocked
        ));
    }

    #[test]
    fn test_percent_encoded_name_resolves() {
        let tmp = make_root();
        std_fs::write(tmp.path().join("my file.txt"), "contents").unwrap();
        let root = tmp.path().canonicalize().unwrap();

        match resolve_path(&root, "/my%20file.txt") {
            Resolved::File(path) => assert!(path.ends_with("my file.txt")),
            other => panic!("encoded name did not resolve: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_percent_sequence_is_not_found() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();
        // %FF does not decode to valid UTF-8
        assert!(matches!(resolve_path(&root, "/%FF"), Resolved::NotFound));
    }

    #[test]
    fn test_dots_in_filename_not_rewritten() {
        let tmp = make_root();
        std_fs::write(tmp.path().join("ab.txt"), "wrong file").unwrap();
        std_fs::write(tmp.path().join("a..b.txt"), "right file").unwrap();
        let root = tmp.path().canonicalize().unwrap();

        // The literal name with the embedded dots is what gets served
        match resolve_path(&root, "/a..b.txt") {
            Resolved::File(path) => assert!(path.ends_with("a..b.txt")),
            other => panic!("dotted name did not resolve: {other:?}"),
        }
        // A nonexistent dotted name must not collapse onto another file
        assert!(matches!(
            resolve_path(&root, "/c..d.txt"),
            Resolved::NotFound
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_blocked() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();

        let outside = tempfile::tempdir().unwrap();
        std_fs::write(outside.path().join("secret.txt"), "secret").unwrap();
        std::os::unix::fs::symlink(
            outside.path().join("secret.txt"),
            tmp.path().join("escape.txt"),
        )
        .unwrap();

        assert!(matches!(
            resolve_path(&root, "/escape.txt"),
            Resolved::Blocked
        ));
    }

    #[tokio::test]
    async fn test_listing_names_entries() {
        let tmp = make_root();
        let root = tmp.path().canonicalize().unwrap();
        let html = render_listing("/", &root).await.unwrap();
        assert!(html.contains("Directory listing for /"));
        assert!(html.contains("page.html"));
        assert!(html.contains("assets/"));
        // No parent link at the root itself
        assert!(!html.contains("href=\"../\""));
    }

    #[tokio::test]
    async fn test_listing_has_parent_link_below_root() {
        let tmp = make_root();
        let dir = tmp.path().join("assets").canonicalize().unwrap();
        let html = render_listing("/assets/", &dir).await.unwrap();
        assert!(html.contains("href=\"../\""));
        assert!(html.contains("app.js"));
    }

    #[tokio::test]
    async fn test_listing_encodes_hrefs() {
        let tmp = tempfile::tempdir().unwrap();
        std_fs::write(tmp.path().join("my file#1.txt"), "x").unwrap();
        let root = tmp.path().canonicalize().unwrap();

        let html = render_listing("/", &root).await.unwrap();
        assert!(html.contains("href=\"my%20file%231.txt\""));
        assert!(html.contains(">my file#1.txt<"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a&b<c>.txt"), "a&amp;b&lt;c&gt;.txt");
    }
}
