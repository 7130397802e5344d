//! End-to-end API tests for Fruit Porter.
//!
//! Tests drive the full router in-process with `tower::ServiceExt::
//! oneshot`: no listening socket, no external services. Every test gets
//! its own freshly seeded store, so tests are independent and can run
//! in parallel.
//!
//! The seeded accounts (`admin@fruitporter.com` / `admin123`,
//! `demo@fruitporter.com` / `demo123`) are the entry point for most
//! scenarios; [`TestApp::login`] turns them into bearer tokens.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use fruit_porter_server::config::ServerConfig;
use fruit_porter_server::state::AppState;
use fruit_porter_server::store::Store;
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@fruitporter.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const DEMO_EMAIL: &str = "demo@fruitporter.com";
pub const DEMO_PASSWORD: &str = "demo123";

/// A full application instance over a freshly seeded store.
pub struct TestApp {
    router: Router,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::seeded()
    }
}

impl TestApp {
    #[must_use]
    pub fn seeded() -> Self {
        let config = ServerConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 0,
            jwt_secret: SecretString::from("kX9#mQ2$vL7@nR4!pT8%wY3&zB6*cF1^"),
            sentry_dsn: None,
            sentry_environment: "test".to_string(),
        };
        let state = AppState::new(&config, Store::seeded());
        Self {
            router: fruit_porter_server::app(state),
        }
    }

    /// Sends one request and returns the status plus the parsed JSON
    /// body (`Value::Null` for empty bodies).
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, path, token, None).await
    }

    pub async fn post(
        &self,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, path, token, Some(body)).await
    }

    pub async fn put(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, token, Some(body)).await
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, token, None).await
    }

    /// Logs in and returns the bearer token.
    pub async fn login(&self, email: &str, password: &str) -> String {
        let (status, body) = self
            .post(
                "/api/auth/login",
                None,
                serde_json::json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_owned()
    }
}

/// Parses a string-encoded decimal out of a JSON value.
#[must_use]
pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    value.as_str().unwrap().parse().unwrap()
}
