//! Integration tests for Rolodex.
//!
//! Every test runs against a `wiremock` server standing in for the Strapi
//! content API, so no external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rolodex-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `contacts_client` - Repository client against the mock API
//! - `contacts_routes` - HTTP routes driven through the router

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::expect_used, clippy::missing_panics_doc)]

use std::io;
use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use rolodex_web::config::{StrapiConfig, WebConfig};
use rolodex_web::state::AppState;
use rolodex_web::strapi::ContactsClient;
use serde_json::{Map, Value, json};
use tower::ServiceExt;
use wiremock::MockServer;

const MAX_BODY_SIZE: usize = 1024 * 1024;

/// Install a test subscriber once. Honors `RUST_LOG`.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Collects formatted log lines written while a [`LogCapture::install`] guard
/// is held on the current thread.
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's events (debug and above) into the capture.
    #[must_use]
    pub fn install(&self) -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Captured lines logged at `level`, e.g. `"ERROR"`.
    #[must_use]
    pub fn lines_at(&self, level: &str) -> Vec<String> {
        let buffer = self.buffer.lock().expect("log buffer lock");
        String::from_utf8_lossy(&buffer)
            .lines()
            .filter(|line| line.split_whitespace().nth(1) == Some(level))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer
            .lock()
            .expect("log buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for LogCapture {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// A mock content API plus a client and router pointed at it.
pub struct TestContext {
    pub mock_server: MockServer,
    pub contacts: ContactsClient,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        init_logging();

        let mock_server = MockServer::start().await;
        let strapi = StrapiConfig::new(&mock_server.uri()).expect("mock server URI is valid");

        let config = WebConfig {
            host: "127.0.0.1".parse().expect("valid IP"),
            port: 0,
            strapi: strapi.clone(),
            sentry_dsn: None,
            sentry_environment: None,
        };

        let contacts = ContactsClient::new(&strapi).expect("client builds");
        let state = AppState::new(&config).expect("state builds");

        Self {
            mock_server,
            contacts,
            app: rolodex_web::app(state),
        }
    }

    /// Send one request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
    }

    /// POST an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, uri: &str, form: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .expect("valid request"),
        )
        .await
    }
}

/// Read a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = to_bytes(response.into_body(), MAX_BODY_SIZE)
        .await
        .expect("body is readable");
    String::from_utf8(bytes.to_vec()).expect("body is UTF-8")
}

/// A contact as the content API sends it: `{ id, attributes: {...} }`.
#[must_use]
pub fn contact_record(id: u64, attributes: &Value) -> Value {
    let mut attributes = attributes.as_object().cloned().unwrap_or_else(Map::new);
    attributes
        .entry("createdAt")
        .or_insert_with(|| json!("2024-03-01T12:30:00.000Z"));
    json!({ "id": id, "attributes": attributes })
}

/// A single-record response body: `{ data: record, meta: {} }`.
#[must_use]
pub fn single(record: Value) -> Value {
    json!({ "data": record, "meta": {} })
}

/// A list response body with pagination metadata.
#[must_use]
pub fn list(records: Vec<Value>) -> Value {
    let total = records.len();
    json!({
        "data": records,
        "meta": {
            "pagination": { "page": 1, "pageSize": 50, "pageCount": 1, "total": total }
        }
    })
}
