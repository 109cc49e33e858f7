//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a media store inside a temporary
//! directory, a default config, and the full [`AppContext`]. The
//! [`TestHarness::with_server`] constructor starts Axum on a random port for
//! HTTP-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;

use report_media::config::Config;
use report_media::media::{MediaService, MediaStore};
use report_media::server::{create_router, AppContext};

/// Boundary used by [`multipart_body`].
pub const BOUNDARY: &str = "report-media-test-boundary";

/// Test harness wrapping a fully-constructed [`AppContext`] backed by a
/// temporary media directory.
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    /// Create a new harness with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a new harness with a custom configuration. The storage base
    /// directory is always redirected into a fresh temp dir.
    pub fn with_config(mut config: Config) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        config.storage.base_dir = dir.path().join("public");
        let media = MediaService::from_config(&config.storage).expect("failed to build store");
        let ctx = AppContext::new(config, media);
        Self { ctx, dir }
    }

    /// Build the application router.
    pub fn router(&self) -> Router {
        create_router(self.ctx.clone())
    }

    /// Direct access to the store.
    pub fn store(&self) -> &MediaStore {
        self.ctx.media.store()
    }

    /// Start an Axum server on a random port and return the harness together
    /// with the bound socket address.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_config(Config::default()).await
    }

    /// Start an Axum server with custom config on a random port.
    pub async fn with_server_config(config: Config) -> (Self, SocketAddr) {
        let harness = Self::with_config(config);
        let app = harness.router();

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (harness, addr)
    }
}

/// Build a `multipart/form-data` body by hand for router-level tests.
///
/// Returns the content type header value and the encoded body.
pub fn multipart_body(report_id: Option<&str>, files: &[(&str, &[u8])]) -> (String, Vec<u8>) {
    let mut body = Vec::new();

    if let Some(report_id) = report_id {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"reportId\"\r\n\r\n{report_id}\r\n"
            )
            .as_bytes(),
        );
    }

    for (name, data) in files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photos\"; filename=\"{name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }

    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

/// Build a POST /api/upload request from a hand-encoded multipart body.
pub fn upload_request(report_id: Option<&str>, files: &[(&str, &[u8])]) -> Request<Body> {
    let (content_type, body) = multipart_body(report_id, files);
    Request::builder()
        .method("POST")
        .uri("/api/upload")
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(body: Body) -> Vec<u8> {
    body.collect().await.unwrap().to_bytes().to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(body: Body) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(body).await).unwrap()
}
