//! Test helpers for quiz-service integration tests.
//!
//! Routers are built around the in-crate mocks, so none of these tests
//! reach the real card database or model API.

#![allow(dead_code)]

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use quiz_service::catalog::CardCatalog;
use quiz_service::config::QuizConfig;
use quiz_service::services::mock::{MockCardLookup, MockDescriber};
use quiz_service::startup::build_router;
use quiz_service::AppState;
use service_core::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::util::ServiceExt;

pub const TEST_CARD: &str = "Mother of Runes";
pub const TEST_ANSWER: &str = "A small cleric in white robes shields an ally.";

/// Config for a test app on a random port. `overrides` take precedence
/// over the defaults below.
pub fn test_config(overrides: &[(&str, &str)]) -> QuizConfig {
    let mut pairs: Vec<(String, String)> = vec![
        ("OPENAI_API".to_string(), "sk-test".to_string()),
        ("REQUEST_TIMEOUT_SECS".to_string(), "10".to_string()),
        ("OUTBOUND_TIMEOUT_SECS".to_string(), "5".to_string()),
    ];
    for (key, value) in overrides {
        pairs.retain(|(k, _)| k != key);
        pairs.push((key.to_string(), value.to_string()));
    }

    QuizConfig::from_lookup(Config { port: 0 }, move |key| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    })
    .expect("Failed to build test config")
}

/// Router plus handles on its mock collaborators.
pub struct TestContext {
    pub router: Router,
    pub lookup: Arc<MockCardLookup>,
    pub describer: Arc<MockDescriber>,
}

impl TestContext {
    pub fn new(cards: &[&str], lookup: MockCardLookup, describer: MockDescriber) -> Self {
        Self::with_timeout(cards, lookup, describer, Duration::from_secs(10))
    }

    /// Like `new`, with the given per-request deadline.
    pub fn with_timeout(
        cards: &[&str],
        lookup: MockCardLookup,
        describer: MockDescriber,
        request_timeout: Duration,
    ) -> Self {
        let lookup = Arc::new(lookup);
        let describer = Arc::new(describer);
        let catalog = CardCatalog::new(cards.iter().copied()).expect("catalog must not be empty");

        let state = AppState::new(Arc::new(catalog), lookup.clone(), describer.clone());

        Self {
            router: build_router(state, request_timeout),
            lookup,
            describer,
        }
    }

    /// Single-card catalog with default mocks.
    pub fn default_single() -> Self {
        Self::new(
            &[TEST_CARD],
            MockCardLookup::new(),
            MockDescriber::new(TEST_ANSWER),
        )
    }

    pub async fn send(&self, method: Method, uri: &str) -> TestResponse {
        self.send_request(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn send_request(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON body")
    }
}
