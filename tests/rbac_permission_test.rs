//! Role gates seen over HTTP.
//!
//! Tests cover:
//! - Missing, invalid and orphaned tokens
//! - Route-level gates per role
//! - Field-level gates on item create and update

mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use inventory_tracker::entities::user::Role;
use serde_json::json;

async fn seeded_item(app: &TestApp) -> i64 {
    app.create_item(json!({
        "manufacturer": "Fluke",
        "model": "87V",
        "quantity": 5,
        "min_quantity": 2
    }))
    .await["id"]
        .as_i64()
        .unwrap()
}

// ==================== Authentication ====================

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app.request(Method::GET, "/api/v1/items", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"]["code"], "AUTH_MISSING");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = TestApp::new().await;
    let response = app
        .request(Method::GET, "/api/v1/items", None, Some("not-a-jwt"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"]["code"], "AUTH_INVALID_TOKEN");
}

#[tokio::test]
async fn login_issues_a_working_token() {
    let app = TestApp::new().await;
    let login = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "username": "intern", "password": common::TEST_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(login.status, StatusCode::OK);
    let body = login.json();
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["user"]["role"], "Intern");
    assert!(body["user"].get("password_hash").is_none());

    let token = body["access_token"].as_str().unwrap().to_string();
    let me = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(me.status, StatusCode::OK);
    let me = me.json();
    assert_eq!(me["username"], "intern");
    let permissions: Vec<&str> = me["permissions"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|p| p.as_str())
        .collect();
    assert!(permissions.contains(&"items:update_quantity"));
    assert!(!permissions.contains(&"items:update"));
}

#[tokio::test]
async fn login_distinguishes_unknown_user_from_bad_password() {
    let app = TestApp::new().await;
    let unknown = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "username": "nobody", "password": "whatever1" })),
            None,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.json()["error"]["message"], "Invalid username.");

    let wrong = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "username": "viewer", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.json()["error"]["message"], "Invalid password.");
}

#[tokio::test]
async fn token_of_deleted_user_stops_working() {
    let app = TestApp::new().await;
    let intern_id = app.user_id(Role::Intern);

    let deleted = app
        .request_as(
            Role::Superuser,
            Method::DELETE,
            &format!("/api/v1/users/{}", intern_id),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let response = app
        .request_as(Role::Intern, Method::GET, "/api/v1/items", None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"]["code"], "AUTH_USER_NOT_FOUND");
}

// ==================== Route gates ====================

#[tokio::test]
async fn every_role_can_read_items() {
    let app = TestApp::new().await;
    for role in common::ALL_ROLES {
        let response = app.request_as(role, Method::GET, "/api/v1/items", None).await;
        assert_eq!(response.status, StatusCode::OK, "{role}");
    }
}

#[tokio::test]
async fn viewer_is_read_only() {
    let app = TestApp::new().await;
    let id = seeded_item(&app).await;

    let attempts = [
        (Method::POST, "/api/v1/items".to_string(), Some(json!({ "manufacturer": "X" }))),
        (Method::PATCH, format!("/api/v1/items/{}", id), Some(json!({}))),
        (Method::PATCH, format!("/api/v1/items/{}", id), Some(json!({ "quantity": 1 }))),
        (Method::DELETE, format!("/api/v1/items/{}", id), None),
        (
            Method::POST,
            "/api/v1/used-items".to_string(),
            Some(json!({ "item_id": id, "work_order": 7 })),
        ),
        (
            Method::POST,
            "/api/v1/item-requests".to_string(),
            Some(json!({ "item_id": id, "quantity_requested": 1, "unit_price": "5.00" })),
        ),
        (
            Method::POST,
            "/api/v1/purchase-orders/export".to_string(),
            Some(json!({ "lines": [] })),
        ),
        (Method::GET, "/api/v1/users".to_string(), None),
        (Method::POST, "/api/v1/notifications/read-all".to_string(), None),
    ];

    for (method, uri, body) in attempts {
        let response = app
            .request_as(Role::Viewer, method.clone(), &uri, body)
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{} {}", method, uri);
    }
}

#[tokio::test]
async fn technician_gates() {
    let app = TestApp::new().await;

    let review = app
        .request_as(Role::Technician, Method::POST, "/api/v1/item-requests/1/accept", None)
        .await;
    assert_eq!(review.status, StatusCode::FORBIDDEN);

    let export = app
        .request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/purchase-orders/export",
            Some(json!({ "lines": [] })),
        )
        .await;
    assert_eq!(export.status, StatusCode::FORBIDDEN);

    let users = app
        .request_as(Role::Technician, Method::GET, "/api/v1/users", None)
        .await;
    assert_eq!(users.status, StatusCode::FORBIDDEN);

    let requests = app
        .request_as(Role::Technician, Method::GET, "/api/v1/item-requests", None)
        .await;
    assert_eq!(requests.status, StatusCode::OK);
}

#[tokio::test]
async fn intern_cannot_see_item_requests() {
    let app = TestApp::new().await;
    let response = app
        .request_as(Role::Intern, Method::GET, "/api/v1/item-requests", None)
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(
        response.json()["error"]["code"],
        "AUTH_INSUFFICIENT_PERMISSIONS"
    );
}

// ==================== Field gates ====================

#[tokio::test]
async fn intern_may_only_change_quantity() {
    let app = TestApp::new().await;
    let id = seeded_item(&app).await;
    let uri = format!("/api/v1/items/{}", id);

    let allowed = app
        .request_as(Role::Intern, Method::PATCH, &uri, Some(json!({ "quantity": 9 })))
        .await;
    assert_eq!(allowed.status, StatusCode::OK);
    assert_eq!(allowed.json()["quantity"], 9);

    let mixed = app
        .request_as(
            Role::Intern,
            Method::PATCH,
            &uri,
            Some(json!({ "quantity": 3, "location": "Shelf Z" })),
        )
        .await;
    assert_eq!(mixed.status, StatusCode::FORBIDDEN);
    assert!(mixed.json()["message"]
        .as_str()
        .unwrap()
        .contains("location"));

    // Nothing from the rejected payload landed.
    let current = app.request_as(Role::Intern, Method::GET, &uri, None).await;
    assert_eq!(current.json()["quantity"], 9);
}

#[tokio::test]
async fn only_superuser_sets_min_quantity() {
    let app = TestApp::new().await;
    let id = seeded_item(&app).await;
    let uri = format!("/api/v1/items/{}", id);

    let technician = app
        .request_as(Role::Technician, Method::PATCH, &uri, Some(json!({ "min_quantity": 10 })))
        .await;
    assert_eq!(technician.status, StatusCode::FORBIDDEN);

    let create = app
        .request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/items",
            Some(json!({ "manufacturer": "Omega", "min_quantity": 4 })),
        )
        .await;
    assert_eq!(create.status, StatusCode::FORBIDDEN);

    let superuser = app
        .request_as(Role::Superuser, Method::PATCH, &uri, Some(json!({ "min_quantity": 10 })))
        .await;
    assert_eq!(superuser.status, StatusCode::OK);
    assert_eq!(superuser.json()["low_stock"], true);
}
