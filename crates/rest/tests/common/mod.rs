//! Common test utilities for API testing.
//!
//! [`TestApp`] wraps an in-memory server and the signed-in users the tests
//! act as.

#![allow(dead_code)]

use axum::http::HeaderValue;
use axum::http::StatusCode;
use axum_test::{TestRequest, TestServer};
use fixlog_persistence::backends::sqlite::SqliteBackend;
use serde_json::{Value, json};

use fixlog_rest::{ServerConfig, X_USER_ID, create_app_with_config};

/// A test server plus the operator registered at startup.
pub struct TestApp {
    /// The test server instance.
    pub server: TestServer,
    /// Profile id of the operator (the first sign-up).
    pub operator: String,
}

impl TestApp {
    /// Starts a server on an in-memory database and registers the operator.
    pub async fn new() -> Self {
        Self::with_config(ServerConfig::for_testing()).await
    }

    /// Starts a server with a custom configuration.
    pub async fn with_config(config: ServerConfig) -> Self {
        let backend = SqliteBackend::in_memory().expect("Failed to create SQLite backend");
        backend.init_schema().expect("Failed to init schema");

        let app = create_app_with_config(backend, config);
        let server = TestServer::new(app).expect("Failed to create test server");

        let mut test_app = Self {
            server,
            operator: String::new(),
        };
        test_app.operator = test_app.signup("ops@fixlog.kr", "운영자").await;
        test_app
    }

    /// Signs up a profile and returns its id.
    pub async fn signup(&self, email: &str, name: &str) -> String {
        let response = self
            .server
            .post("/auth/signup")
            .json(&json!({ "email": email, "display_name": name }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()["id"]
            .as_str()
            .expect("profile id")
            .to_string()
    }

    /// Signs up, promotes and approves a profile, returning its id.
    pub async fn member(&self, email: &str, name: &str, role: &str) -> String {
        let id = self.signup(email, name).await;
        if role != "field" {
            self.put(&format!("/admin/profiles/{id}/role"), &self.operator)
                .json(&json!({ "role": role }))
                .await
                .assert_status_ok();
        }
        self.put(&format!("/admin/profiles/{id}/approve"), &self.operator)
            .await
            .assert_status_ok();
        id
    }

    /// Creates a client as the operator and returns it.
    pub async fn create_client(&self, body: Value) -> Value {
        let response = self.post("/clients", &self.operator).json(&body).await;
        response.assert_status(StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Builds a GET request signed in as `user`.
    pub fn get(&self, path: &str, user: &str) -> TestRequest {
        signed_in(self.server.get(path), user)
    }

    /// Builds a POST request signed in as `user`.
    pub fn post(&self, path: &str, user: &str) -> TestRequest {
        signed_in(self.server.post(path), user)
    }

    /// Builds a PUT request signed in as `user`.
    pub fn put(&self, path: &str, user: &str) -> TestRequest {
        signed_in(self.server.put(path), user)
    }

    /// Builds a DELETE request signed in as `user`.
    pub fn delete(&self, path: &str, user: &str) -> TestRequest {
        signed_in(self.server.delete(path), user)
    }
}

fn signed_in(request: TestRequest, user: &str) -> TestRequest {
    request.add_header(
        X_USER_ID,
        HeaderValue::from_str(user).expect("valid header value"),
    )
}

/// Returns the `error.code` of an error body.
pub fn error_code(body: &Value) -> &str {
    body["error"]["code"].as_str().unwrap_or_default()
}
