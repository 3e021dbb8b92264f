#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use inventory_tracker::{
    app_router,
    config::AppConfig,
    db,
    entities::user::{self, Role},
    logging::LoggingState,
    services::{search::SearchIndex, users::CreateUser},
    AppState,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "correct-horse-battery";
const TEST_SECRET: &str = "integration-test-signing-key-0123456789";

pub const ALL_ROLES: [Role; 4] = [Role::Superuser, Role::Technician, Role::Intern, Role::Viewer];

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: bytes::Bytes,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }
}

/// A fully wired application over a throwaway SQLite file, with one user per role.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub users: HashMap<Role, user::Model>,
    pub tokens: HashMap<Role, String>,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let url = format!(
            "sqlite://{}?mode=rwc",
            dir.path().join("inventory.db").display()
        );
        let config = AppConfig::new(url, TEST_SECRET);

        let pool = db::establish_connection_from_app_config(&config)
            .await
            .expect("connect");
        db::run_migrations(&pool).await.expect("migrate");

        let search = Arc::new(
            SearchIndex::open_in_memory(&config.search.stop_words).expect("search index"),
        );
        let state = AppState::new(Arc::new(pool), config, search);

        let mut users = HashMap::new();
        let mut tokens = HashMap::new();
        for role in ALL_ROLES {
            let name = role.to_string().to_lowercase();
            let model = state
                .services
                .users
                .create(CreateUser {
                    username: name.clone(),
                    first_name: role.to_string(),
                    last_name: "Tester".into(),
                    email: format!("{}@example.com", name),
                    password: TEST_PASSWORD.into(),
                    role,
                })
                .await
                .expect("seed user");
            let token = state.auth.generate_token(&model).expect("token").access_token;
            tokens.insert(role, token);
            users.insert(role, model);
        }

        let router = app_router(state.clone(), Arc::new(LoggingState::discard()));

        Self {
            router,
            state,
            users,
            tokens,
            _dir: dir,
        }
    }

    pub fn token(&self, role: Role) -> &str {
        &self.tokens[&role]
    }

    pub fn user_id(&self, role: Role) -> i32 {
        self.users[&role].id
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body).expect("request")).await
    }

    pub async fn request_as(
        &self,
        role: Role,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let token = self.token(role).to_string();
        self.request(method, uri, body, Some(&token)).await
    }

    /// Posts a raw body, used for spreadsheet uploads.
    pub async fn post_bytes_as(&self, role: Role, uri: &str, bytes: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token(role)))
            .header(
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            )
            .body(Body::from(bytes))
            .expect("request");
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Creates an item as the superuser and returns its JSON.
    pub async fn create_item(&self, body: Value) -> Value {
        let response = self
            .request_as(Role::Superuser, Method::POST, "/api/v1/items", Some(body))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());
        response.json()
    }
}
