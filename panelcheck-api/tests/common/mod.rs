//! Common test utilities for integration tests
//!
//! Builds the full router over the in-memory store, tower-sessions' memory
//! store and a [`MockAnalyzer`], and drives it in-process with `oneshot`.

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use panelcheck_api::{
    app::{build_router, AppState},
    config::Config,
};
use panelcheck_shared::{
    analysis::MockAnalyzer, models::AnalysisResult, store::memory::MemoryStore,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use tower_sessions::cookie::Cookie;

pub const PASSWORD: &str = "breaker-box-42";

/// A response with its body decoded as JSON (`Null` for an empty body)
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The session `Set-Cookie` header, parsed
    pub fn set_session_cookie(&self) -> Option<Cookie<'static>> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .filter_map(|v| Cookie::parse(v.to_string()).ok())
            .find(|cookie| cookie.name() == "panelcheck_session")
    }

    /// `name=value` for a live session cookie, ready for a `Cookie` header
    pub fn session_cookie(&self) -> Option<String> {
        self.set_session_cookie()
            .filter(|cookie| !cookie.value().is_empty())
            .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
    }
}

/// Test context holding the router and its collaborators
pub struct TestContext {
    pub app: Router,
    pub store: Arc<MemoryStore>,
    pub analyzer: Arc<MockAnalyzer>,
}

impl TestContext {
    /// Context whose analyzer returns a compliant verdict
    pub fn new() -> Self {
        Self::with_analyzer(MockAnalyzer::returning(AnalysisResult {
            compliant: true,
            issues: vec![],
            recommendations: vec![],
            summary: "Panel looks compliant".to_string(),
        }))
    }

    pub fn with_analyzer(analyzer: MockAnalyzer) -> Self {
        let config = Config::from_lookup(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".to_string()),
            _ => None,
        })
        .expect("test config");

        let store = Arc::new(MemoryStore::new());
        let analyzer = Arc::new(analyzer);

        let state = AppState::new(store.clone(), analyzer.clone(), config);

        Self {
            app: build_router(state, tower_sessions::MemoryStore::default()),
            store,
            analyzer,
        }
    }

    /// Sends a request, optionally with a session cookie and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        self.dispatch(builder.body(body).unwrap()).await
    }

    /// POSTs a raw JSON body, with or without a `Content-Length` header
    pub async fn post_raw(
        &self,
        uri: &str,
        cookie: Option<&str>,
        body: Vec<u8>,
        declare_length: bool,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");

        if declare_length {
            builder = builder.header(header::CONTENT_LENGTH, body.len());
        }
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }

        self.dispatch(builder.body(Body::from(body)).unwrap()).await
    }

    async fn dispatch(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, cookie, None).await
    }

    pub async fn post(&self, uri: &str, cookie: Option<&str>, body: Value) -> TestResponse {
        self.send(Method::POST, uri, cookie, Some(body)).await
    }

    /// Registers a user and returns the session cookie
    pub async fn register(&self, email: &str) -> String {
        let response = self
            .post(
                "/api/register",
                None,
                json!({"email": email, "password": PASSWORD, "confirmPassword": PASSWORD}),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.session_cookie().expect("session cookie")
    }

    /// Creates a project and returns its id
    pub async fn create_project(&self, cookie: &str, name: &str) -> i64 {
        let response = self
            .post(
                "/api/projects",
                Some(cookie),
                json!({"name": name, "address": "12 Elm St"}),
            )
            .await;

        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["id"].as_i64().expect("project id")
    }
}
