/// Common test utilities for HTTP-level tests
///
/// The router runs against a [`MemoryStore`], so these tests need no database.
/// Seed data goes straight through the store; assertions go through HTTP.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, AuthConfig, Config, DatabaseConfig};
use taskboard_shared::auth::password::CredentialScheme;
use taskboard_shared::models::{project::CreateProject, task::CreateTask, user::CreateUser};
use taskboard_shared::store::{MemoryStore, Store};
use tower::Service as _;

/// Router plus a handle on the store behind it
pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_scheme(CredentialScheme::Plaintext)
    }

    pub fn with_scheme(password_scheme: CredentialScheme) -> Self {
        let store = MemoryStore::new();
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: Vec::new(),
            },
            database: DatabaseConfig {
                url: "postgresql://unused".to_string(),
                max_connections: 1,
            },
            auth: AuthConfig { password_scheme },
        };

        let state = AppState::new(Arc::new(store.clone()), config);
        Self {
            store,
            app: build_router(state),
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None).await
    }

    pub async fn seed_user(&self, login: &str, password: &str) -> i64 {
        self.store
            .insert_user(CreateUser {
                name: format!("User {login}"),
                role: "employee".to_string(),
                code: "INV".to_string(),
                login: login.to_string(),
                password: password.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn seed_project(&self, name: &str) -> i64 {
        self.store
            .insert_project(CreateProject {
                name: name.to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn seed_task(&self, project_id: i64, name: &str) -> i64 {
        self.store
            .insert_task(CreateTask {
                name: name.to_string(),
                date: "2024-01-01".to_string(),
                project_id,
                status: "todo".to_string(),
                ..Default::default()
            })
            .await
            .unwrap()
    }
}
