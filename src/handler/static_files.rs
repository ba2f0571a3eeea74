//! Static file serving module
//!
//! Serves the front-end from `static_files.root` with index files, MIME
//! detection and `ETag` revalidation.

use crate::config::StaticFilesConfig;
use crate::handler::router::RequestContext;
use crate::http::{self, cache, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Serve a request path from the configured root
pub async fn serve_directory(
    ctx: &RequestContext,
    config: &StaticFilesConfig,
) -> Response<Full<Bytes>> {
    match load_from_directory(&config.root, &ctx.path, &config.index_files).await {
        Some((content, content_type)) => build_static_file_response(
            content,
            content_type,
            ctx.if_none_match.as_deref(),
            ctx.is_head,
        ),
        None => http::build_404_response(),
    }
}

/// Relative path made of the request's normal components only
///
/// `None` when the path tries to climb out with `..`.
fn relative_path(request_path: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for component in Path::new(request_path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => relative.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(relative)
}

/// Load a file below `root`, trying index files for directories
pub async fn load_from_directory(
    root: &str,
    path: &str,
    index_files: &[String],
) -> Option<(Bytes, &'static str)> {
    let Some(relative) = relative_path(path) else {
        log::warn!("Path traversal attempt blocked: {path}");
        return None;
    };

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            log::warn!("Static directory not found or inaccessible '{root}': {e}");
            return None;
        }
    };

    let mut file_path = root_canonical.join(&relative);

    if fs::metadata(&file_path).await.is_ok_and(|m| m.is_dir()) {
        let mut found = None;
        for index_file in index_files {
            let index_path = file_path.join(index_file);
            if fs::metadata(&index_path).await.is_ok_and(|m| m.is_file()) {
                found = Some(index_path);
                break;
            }
        }
        file_path = found?;
    }

    // Missing files are ordinary 404s
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        log::warn!(
            "Path traversal attempt blocked: {path} -> {}",
            file_canonical.display()
        );
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to read file '{}': {e}", file_canonical.display());
            return None;
        }
    };

    let content_type = mime::get_content_type(file_path.extension().and_then(|e| e.to_str()));

    Some((Bytes::from(content), content_type))
}

fn build_static_file_response(
    data: Bytes,
    content_type: &str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(&data);

    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    http::response::build_cached_response(data, content_type, &etag, is_head)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use hyper::StatusCode;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scratch directory removed on drop
    struct ScratchDir(PathBuf);

    impl ScratchDir {
        fn new() -> Self {
            static COUNTER: AtomicUsize = AtomicUsize::new(0);
            let dir = std::env::temp_dir().join(format!(
                "geodist-static-{}-{}",
                std::process::id(),
                COUNTER.fetch_add(1, Ordering::SeqCst)
            ));
            std::fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, name: &str, content: &str) {
            let path = self.0.join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }

        fn root(&self) -> String {
            self.0.to_string_lossy().into_owned()
        }
    }

    impl Drop for ScratchDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    fn index_files() -> Vec<String> {
        vec!["index.html".to_string(), "index.htm".to_string()]
    }

    fn ctx(path: &str) -> RequestContext {
        RequestContext {
            path: path.to_string(),
            query: None,
            is_head: false,
            if_none_match: None,
        }
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(relative_path("/"), Some(PathBuf::new()));
        assert_eq!(
            relative_path("/js/./app.js"),
            Some(PathBuf::from("js").join("app.js"))
        );
        assert_eq!(relative_path("/../etc/passwd"), None);
        assert_eq!(relative_path("/a/../../b"), None);
        // Two dots inside a name are not a parent reference
        assert_eq!(relative_path("/notes..txt"), Some(PathBuf::from("notes..txt")));
    }

    #[tokio::test]
    async fn test_load_file_and_index() {
        let dir = ScratchDir::new();
        dir.write("index.html", "<h1>geodist</h1>");
        dir.write("js/script.js", "fetch('/distance')");
        dir.write("docs/index.htm", "docs");

        let (content, content_type) = load_from_directory(&dir.root(), "/", &index_files())
            .await
            .unwrap();
        assert_eq!(content, Bytes::from_static(b"<h1>geodist</h1>"));
        assert_eq!(content_type, "text/html; charset=utf-8");

        let (_, content_type) = load_from_directory(&dir.root(), "/js/script.js", &index_files())
            .await
            .unwrap();
        assert_eq!(content_type, "text/javascript; charset=utf-8");

        let (content, _) = load_from_directory(&dir.root(), "/docs/", &index_files())
            .await
            .unwrap();
        assert_eq!(content, Bytes::from_static(b"docs"));
    }

    #[tokio::test]
    async fn test_missing_and_escaping_paths() {
        let dir = ScratchDir::new();
        dir.write("public/index.html", "inside");
        dir.write("secret.txt", "outside");
        let root = dir.0.join("public").to_string_lossy().into_owned();

        assert!(load_from_directory(&root, "/nope.html", &index_files()).await.is_none());
        assert!(load_from_directory(&root, "/../secret.txt", &index_files()).await.is_none());
        assert!(load_from_directory(&root, "/%2e%2e/secret.txt", &index_files()).await.is_none());

        // Directory without an index file
        dir.write("public/empty/.keep", "");
        assert!(load_from_directory(&root, "/empty/", &index_files()).await.is_none());

        assert!(load_from_directory("/does/not/exist", "/", &index_files()).await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_out_of_root_is_blocked() {
        let dir = ScratchDir::new();
        dir.write("public/index.html", "inside");
        dir.write("secret.txt", "outside");
        std::os::unix::fs::symlink(dir.0.join("secret.txt"), dir.0.join("public/leak.txt"))
            .unwrap();
        let root = dir.0.join("public").to_string_lossy().into_owned();

        assert!(load_from_directory(&root, "/leak.txt", &index_files()).await.is_none());
    }

    #[tokio::test]
    async fn test_serve_directory_revalidation() {
        let dir = ScratchDir::new();
        dir.write("index.html", "<p>hello</p>");
        let config = StaticFilesConfig {
            root: dir.root(),
            index_files: index_files(),
        };

        let response = serve_directory(&ctx("/index.html"), &config).await;
        assert_eq!(response.status(), StatusCode::OK);
        let etag = response.headers()["ETag"].to_str().unwrap().to_string();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, Bytes::from_static(b"<p>hello</p>"));

        let mut revalidate = ctx("/");
        revalidate.if_none_match = Some(etag);
        let response = serve_directory(&revalidate, &config).await;
        assert_eq!(response.status(), StatusCode::NOT_MODIFIED);

        let mut head = ctx("/index.html");
        head.is_head = true;
        let response = serve_directory(&head, &config).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["Content-Length"], "12");
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert!(body.is_empty());

        let response = serve_directory(&ctx("/missing.css"), &config).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
