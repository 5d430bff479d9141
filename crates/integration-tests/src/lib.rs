//! Integration tests for SevaSangam.
//!
//! Both services are driven in-process with `tower::ServiceExt::oneshot`
//! against one shared [`MemoryBackend`]. Each service keeps its own query
//! cache, as in production, so tests that mix them should read from the
//! storefront only after the admin side has finished writing.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p seva-sangam-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

use seva_sangam_client::{BackendConfig, MemoryBackend, wrap_with_cache};
use seva_sangam_core::SharedBackend;

pub use seva_sangam_storefront::middleware::PRINCIPAL_HEADER;

pub const ADMIN_USERNAME: &str = "moderator";
pub const ADMIN_PASSWORD: &str = "Tz8-quiet-Lantern-41";

/// A captured response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// `name=value` of the first `Set-Cookie`, ready for a `Cookie` header.
    #[must_use]
    pub fn cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(str::to_string)
    }

    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

/// Builder for one request.
pub struct Call {
    method: Method,
    uri: String,
    body: Option<Value>,
    cookie: Option<String>,
    principal: Option<String>,
}

impl Call {
    #[must_use]
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            body: None,
            cookie: None,
            principal: None,
        }
    }

    #[must_use]
    pub fn get(uri: impl Into<String>) -> Self {
        Self::new(Method::GET, uri)
    }

    #[must_use]
    pub fn post(uri: impl Into<String>) -> Self {
        Self::new(Method::POST, uri)
    }

    #[must_use]
    pub fn put(uri: impl Into<String>) -> Self {
        Self::new(Method::PUT, uri)
    }

    #[must_use]
    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri)
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn cookie(mut self, cookie: &str) -> Self {
        self.cookie = Some(cookie.to_string());
        self
    }

    #[must_use]
    pub fn principal(mut self, principal: &str) -> Self {
        self.principal = Some(principal.to_string());
        self
    }

    /// Send to `app` and capture the response.
    pub async fn send(self, app: &Router) -> TestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(principal) = &self.principal {
            builder = builder.header(PRINCIPAL_HEADER, principal);
        }
        let request = match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Both services wired to one in-memory backend.
pub struct TestContext {
    pub memory: MemoryBackend,
    pub storefront: Router,
    pub admin: Router,
}

impl TestContext {
    #[must_use]
    pub fn new() -> Self {
        let memory = MemoryBackend::with_admin(
            ADMIN_USERNAME,
            SecretString::from(ADMIN_PASSWORD.to_string()),
        );

        let storefront = seva_sangam_storefront::app(
            seva_sangam_storefront::state::AppState::with_backend(
                seva_sangam_storefront::config::StorefrontConfig::for_tests(),
                cached(&memory),
            ),
        );
        let admin = seva_sangam_admin::app(seva_sangam_admin::state::AppState::with_backend(
            seva_sangam_admin::config::AdminConfig::for_tests(),
            cached(&memory),
        ));

        Self {
            memory,
            storefront,
            admin,
        }
    }

    /// Log in to the admin API and return the session cookie.
    pub async fn login(&self) -> String {
        let response = Call::post("/api/auth/login")
            .json(json!({ "username": ADMIN_USERNAME, "password": ADMIN_PASSWORD }))
            .send(&self.admin)
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
        response.cookie().unwrap()
    }

    /// Register a worker through the storefront; returns the new id.
    pub async fn register_worker(&self, principal: &str, body: Value) -> String {
        let response = Call::post("/api/me/worker")
            .principal(principal)
            .json(body)
            .send(&self.storefront)
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);
        response.body["profile"]["id"].as_str().unwrap().to_string()
    }

    /// Approve and publish a worker through the admin API.
    pub async fn approve_and_publish(&self, cookie: &str, worker_id: &str) {
        for action in ["approve", "publish"] {
            let response = Call::post(format!("/api/workers/{worker_id}/{action}"))
                .cookie(cookie)
                .send(&self.admin)
                .await;
            assert_eq!(response.status, StatusCode::OK, "{action}: {:?}", response.body);
        }
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn cached(memory: &MemoryBackend) -> SharedBackend {
    wrap_with_cache(Arc::new(memory.clone()), &BackendConfig::memory())
}

/// A valid registration form.
#[must_use]
pub fn registration(name: &str, category: &str, city: &str, availability: &str) -> Value {
    json!({
        "full_name": name,
        "phone_number": "98765 43210",
        "category_id": category,
        "years_experience": 3,
        "city": city,
        "district": "Kamrup",
        "rate_per_hour": 300,
        "availability": availability,
    })
}

/// The edit form matching [`registration`], with overrides applied.
#[must_use]
pub fn edit_form(name: &str, city: &str, availability: &str, years: u32) -> Value {
    json!({
        "full_name": name,
        "phone_number": "98765 43210",
        "years_experience": years,
        "city": city,
        "district": "Kamrup",
        "rate_per_hour": 300,
        "availability": availability,
    })
}
