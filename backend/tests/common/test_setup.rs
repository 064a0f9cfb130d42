use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use backend::{
    notes::{NoteReader, NoteWriter},
    server,
    test_utils::{FakeCipher, InMemoryObjectStore, StaticSecretResolver},
};
use jotnook_types::FixedClock;
use tower::ServiceExt;

use super::parse_response_body;

pub const TEST_BUCKET: &str = "jotnook-test-bucket";
pub const TEST_KEY_ID: &str = "alias/jotnook-test";
pub const TEST_EPOCH_MILLIS: i64 = 1_700_000_000_000;

/// Initialize tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init()
        .ok();
}

/// Router wired to in-memory storage, a fake cipher and a pinned clock
pub struct TestContext {
    pub router: Router,
    pub store: Arc<InMemoryObjectStore>,
    pub cipher: Arc<FakeCipher>,
    pub clock: Arc<FixedClock>,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_parts(
            StaticSecretResolver::new(TEST_BUCKET, TEST_KEY_ID),
            FakeCipher::new(),
        )
    }

    /// Context whose secret store is unreachable
    pub fn without_secrets() -> Self {
        Self::with_parts(StaticSecretResolver::unavailable(), FakeCipher::new())
    }

    pub fn with_parts(secrets: StaticSecretResolver, cipher: FakeCipher) -> Self {
        setup_test_env();

        let secrets = Arc::new(secrets);
        let store = Arc::new(InMemoryObjectStore::new());
        let cipher = Arc::new(cipher);
        let clock = Arc::new(FixedClock::new(TEST_EPOCH_MILLIS));

        let writer = Arc::new(NoteWriter::new(
            secrets.clone(),
            store.clone(),
            cipher.clone(),
            clock.clone(),
        ));
        let reader = Arc::new(NoteReader::new(secrets, store.clone(), cipher.clone()));

        Self {
            router: server::router(writer, reader),
            store,
            cipher,
            clock,
        }
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        self.send_raw_post_request(route, payload.to_string()).await
    }

    pub async fn send_raw_post_request(
        &self,
        route: &str,
        body: impl Into<Body>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json")
            .body(body.into())?;

        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    /// Fetches `/fetch` and returns the parsed body
    pub async fn fetch_notes(&self) -> serde_json::Value {
        let response = self
            .send_get_request("/fetch")
            .await
            .expect("Failed to send request");
        assert_eq!(response.status(), http::StatusCode::OK);
        parse_response_body(response).await
    }
}
