#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use std::sync::Arc;
use thoughts_service::config::{CorsConfig, MongoConfig, StoreBackend, ThoughtsConfig};
use thoughts_service::services::{InMemoryThoughtStore, ThoughtStore};
use thoughts_service::startup::{build_router, Application};
use tower::util::ServiceExt;

/// Router backed by an in-memory store, driven with `oneshot`.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<InMemoryThoughtStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryThoughtStore::new());
        let dyn_store: Arc<dyn ThoughtStore> = store.clone();
        let router = build_router(dyn_store, &CorsConfig::default());
        Self { router, store }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn post_empty(&self, uri: &str) -> (StatusCode, Value) {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// Create a thought and return its id.
    pub async fn create(&self, message: &str) -> String {
        let (status, body) = self
            .post_json("/thoughts", serde_json::json!({ "message": message }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "unexpected body: {}", body);
        body["response"]["id"].as_str().unwrap().to_string()
    }

    pub async fn like(&self, id: &str) -> (StatusCode, Value) {
        self.post_empty(&format!("/thoughts/{}/like", id)).await
    }
}

pub fn memory_config() -> ThoughtsConfig {
    ThoughtsConfig {
        common: CoreConfig {
            port: 0,
            environment: "test".to_string(),
            log_level: "error".to_string(),
            otlp_endpoint: None,
        },
        mongodb: MongoConfig {
            uri: "mongodb://localhost:27017".to_string(),
            database: "happyThoughts_test".to_string(),
        },
        store: StoreBackend::Memory,
        cors: CorsConfig::default(),
    }
}

/// Full application on a random port, like the binary runs it.
pub async fn spawn_app(config: ThoughtsConfig) -> String {
    let app = Application::build(config)
        .await
        .expect("Failed to build test application");
    let address = format!("http://127.0.0.1:{}", app.port());

    tokio::spawn(async move {
        app.run_until_stopped().await.ok();
    });

    let client = reqwest::Client::new();
    for _ in 0..50 {
        if client
            .get(format!("{}/health", address))
            .send()
            .await
            .is_ok()
        {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    address
}
