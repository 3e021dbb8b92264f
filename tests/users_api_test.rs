mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use inventory_tracker::entities::user::Role;
use serde_json::json;

fn new_user(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "first_name": "Dana",
        "last_name": "Reyes",
        "email": format!("{}@example.com", username),
        "password": "s3cure-enough",
        "role": "Technician"
    })
}

#[tokio::test]
async fn superuser_manages_accounts() {
    let app = TestApp::new().await;

    let created = app
        .request_as(Role::Superuser, Method::POST, "/api/v1/users", Some(new_user("dreyes")))
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{:?}", created.json());
    let body = created.json();
    assert_eq!(body["role"], "Technician");
    assert!(body.get("password").is_none());
    assert!(body.get("password_hash").is_none());
    let id = body["id"].as_i64().unwrap();

    let updated = app
        .request_as(
            Role::Superuser,
            Method::PATCH,
            &format!("/api/v1/users/{}", id),
            Some(json!({ "role": "Intern" })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.json()["role"], "Intern");

    let listed = app
        .request_as(Role::Superuser, Method::GET, "/api/v1/users", None)
        .await;
    assert_eq!(listed.json()["pagination"]["total"], 5);

    let login = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "username": "dreyes", "password": "s3cure-enough" })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.json()["user"]["role"], "Intern");
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = TestApp::new().await;
    let response = app
        .request_as(Role::Superuser, Method::POST, "/api/v1/users", Some(new_user("viewer")))
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_user_fields_are_rejected() {
    let app = TestApp::new().await;
    let mut body = new_user("has space");
    body["password"] = json!("short");
    body["email"] = json!("not-an-email");

    let response = app
        .request_as(Role::Superuser, Method::POST, "/api/v1/users", Some(body))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let details = response.json()["details"].clone();
    assert!(details["username"].is_array());
    assert!(details["password"].is_array());
    assert!(details["email"].is_array());
}

#[tokio::test]
async fn superuser_cannot_delete_self() {
    let app = TestApp::new().await;
    let id = app.user_id(Role::Superuser);
    let response = app
        .request_as(
            Role::Superuser,
            Method::DELETE,
            &format!("/api/v1/users/{}", id),
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_user_keeps_their_items() {
    let app = TestApp::new().await;
    let item = app
        .request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/items",
            Some(json!({ "manufacturer": "Omega", "quantity": 4 })),
        )
        .await
        .json();
    let item_id = item["id"].as_i64().expect("technician may create items");
    assert_eq!(item["last_modified_by"], app.user_id(Role::Technician));

    let requested = app
        .request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/item-requests",
            Some(json!({ "item_id": item_id, "quantity_requested": 1 })),
        )
        .await;
    assert_eq!(requested.status, StatusCode::CREATED);

    let deleted = app
        .request_as(
            Role::Superuser,
            Method::DELETE,
            &format!("/api/v1/users/{}", app.user_id(Role::Technician)),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let kept = app
        .request_as(
            Role::Viewer,
            Method::GET,
            &format!("/api/v1/items/{}", item_id),
            None,
        )
        .await;
    assert_eq!(kept.status, StatusCode::OK);
    assert!(kept.json()["last_modified_by"].is_null());

    let history = app
        .request_as(
            Role::Viewer,
            Method::GET,
            &format!("/api/v1/items/{}/history", item_id),
            None,
        )
        .await
        .json();
    assert!(history[0]["user_id"].is_null());

    let requests = app
        .request_as(Role::Superuser, Method::GET, "/api/v1/item-requests", None)
        .await
        .json();
    assert_eq!(requests["pagination"]["total"], 0);
}

#[tokio::test]
async fn unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request_as(Role::Superuser, Method::GET, "/api/v1/users/4040", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_database_and_index() {
    let app = TestApp::new().await;
    app.create_item(json!({ "manufacturer": "Fluke" })).await;

    let response = app.request(Method::GET, "/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"], "up");
    assert_eq!(body["indexed_items"], 1);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::new().await;
    let generated = app.request(Method::GET, "/health", None, None).await;
    assert!(generated.headers.contains_key("x-request-id"));

    let request = axum::http::Request::builder()
        .uri("/api/v1/items/999")
        .header("x-request-id", "req-fixed-42")
        .header(
            axum::http::header::AUTHORIZATION,
            format!("Bearer {}", app.token(Role::Viewer)),
        )
        .body(axum::body::Body::empty())
        .unwrap();
    let echoed = app.send(request).await;
    assert_eq!(echoed.status, StatusCode::NOT_FOUND);
    assert_eq!(echoed.headers.get("x-request-id").unwrap(), "req-fixed-42");
    assert_eq!(echoed.json()["request_id"], "req-fixed-42");
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = TestApp::new().await;
    let response = app
        .request_as(Role::Superuser, Method::GET, "/api/v1/widgets", None)
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
