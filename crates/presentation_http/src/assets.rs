//! Static asset serving
//!
//! Resolves files under the build output directory and serves them with
//! extension-based cache policies. Two fallback chains cover client-side
//! routing: `/admin*` paths fall back to the admin bundle's `index.html`,
//! every other path falls back to the site bundle's `index.html`.

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

/// One-year cache for fingerprinted build artifacts.
const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Short cache for content that changes between deployments.
const CACHE_SHORT: &str = "public, max-age=300";

/// The SPA entry points are never cached so route changes ship immediately.
const CACHE_NONE: &str = "no-cache, no-store, must-revalidate";

const ADMIN_MISSING: &str =
    "Admin interface not found. Please ensure the admin build is included in deployment.";

const APP_MISSING: &str =
    "Application not found. Please ensure the build process completed successfully.";

/// Serves files from the frontend build output
#[derive(Debug, Clone)]
pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    /// Create a resolver rooted at the given build output directory
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Serve the asset for a request path, applying the fallback chain
    pub async fn serve(&self, path: &str) -> Response {
        if path.starts_with("/admin") {
            self.serve_admin(path).await
        } else {
            self.serve_site(path).await
        }
    }

    /// Admin chain: exact asset, then `admin/index.html`, then 404
    async fn serve_admin(&self, path: &str) -> Response {
        if let Some(response) = self.try_file(path).await {
            return response;
        }

        if let Some(bytes) = self.read_file("/admin/index.html").await {
            return spa_index_response(bytes);
        }

        debug!(path, "Admin asset and fallback both missing");
        plain_not_found(ADMIN_MISSING)
    }

    /// Site chain: exact asset, then `index.html`, then 404
    async fn serve_site(&self, path: &str) -> Response {
        if let Some(response) = self.try_file(path).await {
            return response;
        }

        if let Some(bytes) = self.read_file("/index.html").await {
            return spa_index_response(bytes);
        }

        debug!(path, "Asset and index fallback both missing");
        plain_not_found(APP_MISSING)
    }

    /// Read the exact asset and build a cached response, or `None` on miss
    async fn try_file(&self, path: &str) -> Option<Response> {
        let bytes = self.read_file(path).await?;
        let extension = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime_for(&extension));

        if let Some(policy) = cache_policy(&extension) {
            builder = builder.header(header::CACHE_CONTROL, policy);
        }

        match builder.body(Body::from(bytes)) {
            Ok(response) => Some(response),
            Err(e) => {
                error!(error = %e, path, "Failed to build asset response");
                None
            }
        }
    }

    async fn read_file(&self, request_path: &str) -> Option<Vec<u8>> {
        let file_path = self.resolve(request_path)?;
        if !file_path.is_file() {
            return None;
        }
        tokio::fs::read(&file_path).await.ok()
    }

    /// Map a request path to a filesystem path, rejecting traversal
    fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let relative = request_path.trim_start_matches('/');
        if relative.is_empty() {
            return None;
        }

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(_) => {}
                _ => return None,
            }
        }

        Some(self.root.join(relative))
    }
}

/// Serve the SPA entry point with caching disabled
fn spa_index_response(bytes: Vec<u8>) -> Response {
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CACHE_CONTROL, CACHE_NONE)
        .header(header::PRAGMA, "no-cache")
        .header(header::EXPIRES, "0")
        .body(Body::from(bytes))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn plain_not_found(message: &'static str) -> Response {
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(message))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

fn cache_policy(extension: &str) -> Option<&'static str> {
    match extension {
        "js" | "css" | "png" | "jpg" | "jpeg" | "gif" | "svg" | "ico" | "woff" | "woff2"
        | "ttf" | "eot" => Some(CACHE_IMMUTABLE),
        "html" | "json" => Some(CACHE_SHORT),
        _ => None,
    }
}

fn mime_for(extension: &str) -> &'static str {
    match extension {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "eot" => "application/vnd.ms-fontobject",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "webmanifest" => "application/manifest+json",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn build_output() -> (TempDir, StaticAssets) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>site</html>").unwrap();
        fs::write(dir.path().join("app.js"), "console.log('hi')").unwrap();
        fs::write(dir.path().join("style.css"), "body{}").unwrap();
        fs::write(dir.path().join("data.json"), "{}").unwrap();

        let admin = dir.path().join("admin");
        fs::create_dir(&admin).unwrap();
        fs::write(admin.join("index.html"), "<html>admin</html>").unwrap();
        fs::write(admin.join("admin.js"), "void 0").unwrap();

        let assets = StaticAssets::new(dir.path().to_path_buf());
        (dir, assets)
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn exact_asset_gets_immutable_cache() {
        let (_dir, assets) = build_output();
        let response = assets.serve("/app.js").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_IMMUTABLE
        );
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/javascript; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn html_and_json_get_short_cache() {
        let (_dir, assets) = build_output();

        let html = assets.serve("/index.html").await;
        assert_eq!(
            html.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_SHORT
        );

        let json = assets.serve("/data.json").await;
        assert_eq!(
            json.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_SHORT
        );
    }

    #[tokio::test]
    async fn unknown_route_falls_back_to_uncached_index() {
        let (_dir, assets) = build_output();
        let response = assets.serve("/screenings/archive").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            CACHE_NONE
        );
        assert_eq!(response.headers().get(header::PRAGMA).unwrap(), "no-cache");
        assert_eq!(response.headers().get(header::EXPIRES).unwrap(), "0");
        assert_eq!(body_string(response).await, "<html>site</html>");
    }

    #[tokio::test]
    async fn admin_route_falls_back_to_admin_index() {
        let (_dir, assets) = build_output();

        let exact = assets.serve("/admin/admin.js").await;
        assert_eq!(exact.status(), StatusCode::OK);

        let routed = assets.serve("/admin/collections/posts").await;
        assert_eq!(routed.status(), StatusCode::OK);
        assert_eq!(body_string(routed).await, "<html>admin</html>");
    }

    #[tokio::test]
    async fn missing_admin_bundle_is_a_plain_404() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("index.html"), "<html>site</html>").unwrap();
        let assets = StaticAssets::new(dir.path().to_path_buf());

        let response = assets.serve("/admin").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain"
        );
        assert!(body_string(response).await.contains("admin build"));
    }

    #[tokio::test]
    async fn empty_build_directory_is_a_plain_404() {
        let dir = TempDir::new().unwrap();
        let assets = StaticAssets::new(dir.path().to_path_buf());

        let response = assets.serve("/anything").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_string(response).await.contains("build process"));
    }

    #[tokio::test]
    async fn traversal_is_rejected_before_touching_disk() {
        let (_dir, assets) = build_output();

        let response = assets.serve("/../secret.txt").await;
        // Traversal never resolves; the SPA fallback answers instead.
        assert_eq!(body_string(response).await, "<html>site</html>");

        assert!(assets.resolve("/../secret.txt").is_none());
        assert!(assets.resolve("/sub/../../secret.txt").is_none());
        assert!(assets.resolve("/app.js").is_some());
    }
}
