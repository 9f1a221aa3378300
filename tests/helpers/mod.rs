#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;
use zeny::auth::{StaticCredentials, TokenService};
use zeny::db::{self, SharedConnection};
use zeny::provider::{GenerationProvider, GenerativeModel, ProviderError, RemoteModel};
use zeny::server::{build_router, AppState};

pub const TEST_SECRET: &str = "test-secret";
pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";

/// Provider whose models answer with their id and the full prompt, padded
/// with whitespace so callers can check trimming.
pub struct EchoProvider;

struct EchoModel(String);

#[async_trait]
impl GenerativeModel for EchoModel {
    fn id(&self) -> &str {
        &self.0
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        Ok(format!("\n  ({}) {prompt}  \n", self.0))
    }
}

#[async_trait]
impl GenerationProvider for EchoProvider {
    fn model(&self, model_id: &str) -> Arc<dyn GenerativeModel> {
        Arc::new(EchoModel(model_id.to_string()))
    }

    async fn list_remote_models(&self) -> Result<Vec<RemoteModel>, ProviderError> {
        Ok(vec![])
    }
}

/// Provider whose every call fails as if the quota were exhausted.
pub struct FailingProvider;

struct FailingModel(String);

#[async_trait]
impl GenerativeModel for FailingModel {
    fn id(&self) -> &str {
        &self.0
    }

    async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
        Err(ProviderError::Status {
            status: 429,
            body: "RESOURCE_EXHAUSTED".into(),
        })
    }
}

#[async_trait]
impl GenerationProvider for FailingProvider {
    fn model(&self, model_id: &str) -> Arc<dyn GenerativeModel> {
        Arc::new(FailingModel(model_id.to_string()))
    }

    async fn list_remote_models(&self) -> Result<Vec<RemoteModel>, ProviderError> {
        Err(ProviderError::EmptyResponse)
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: SharedConnection,
}

/// Router over a fresh in-memory database with admin/admin credentials.
pub fn test_app(provider: Option<Arc<dyn GenerationProvider>>) -> TestApp {
    let conn = db::open_memory_database().unwrap();
    let db: SharedConnection = Arc::new(Mutex::new(conn));
    let state = AppState::new(
        Arc::clone(&db),
        provider,
        DEFAULT_MODEL,
        TokenService::new(TEST_SECRET),
        Arc::new(StaticCredentials::new("admin", "admin")),
    );
    TestApp {
        router: build_router(state),
        db,
    }
}

pub fn echo_app() -> TestApp {
    test_app(Some(Arc::new(EchoProvider)))
}

impl TestApp {
    /// Send a request and decode the JSON body (`Value::Null` if there is none).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// GET with a raw `Authorization` header value.
    pub async fn get_with_authorization(&self, uri: &str, authorization: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(header::AUTHORIZATION, authorization)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    /// Log in as admin/admin and return the bearer token.
    pub async fn admin_token(&self) -> String {
        let (status, body) = self
            .post(
                "/api/admin/login",
                serde_json::json!({"username": "admin", "password": "admin"}),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Create an avatar through the admin API and return its JSON.
    pub async fn create_avatar(&self, token: &str, name: &str) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/admin/avatars",
                Some(token),
                Some(avatar_body(name)),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {body}");
        body
    }
}

pub fn avatar_body(name: &str) -> Value {
    serde_json::json!({
        "name": name,
        "description": format!("{name} is a helpful guide"),
        "personality": "Cheerful and curious.",
        "instructions": "Answer briefly and always end with a question.",
    })
}
