mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use inventory_tracker::entities::user::Role;
use serde_json::json;

async fn item_with_quantity(app: &TestApp, quantity: i32) -> i64 {
    app.create_item(json!({
        "manufacturer": "Panduit",
        "model": "PLT2S",
        "part_number": "PLT2S-C",
        "quantity": quantity,
        "min_quantity": 1
    }))
    .await["id"]
        .as_i64()
        .unwrap()
}

#[tokio::test]
async fn using_an_item_decrements_stock_and_logs_history() {
    let app = TestApp::new().await;
    let id = item_with_quantity(&app, 2).await;

    let used = app
        .request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/used-items",
            Some(json!({ "item_id": id, "work_order": 4411 })),
        )
        .await;
    assert_eq!(used.status, StatusCode::CREATED, "{:?}", used.json());
    let body = used.json();
    assert_eq!(body["work_order"], 4411);
    assert_eq!(body["used_by"], app.user_id(Role::Technician));

    let item = app
        .request_as(Role::Viewer, Method::GET, &format!("/api/v1/items/{}", id), None)
        .await
        .json();
    assert_eq!(item["quantity"], 1);
    assert_eq!(item["low_stock"], false);

    let history = app
        .request_as(
            Role::Viewer,
            Method::GET,
            &format!("/api/v1/items/{}/history", id),
            None,
        )
        .await
        .json();
    assert_eq!(history[0]["action"], "use");
    assert_eq!(history[0]["changes"], "Item used in work order 4411");
}

#[tokio::test]
async fn using_the_last_unit_raises_low_stock_alert() {
    let app = TestApp::new().await;
    let id = item_with_quantity(&app, 1).await;

    app.request_as(
        Role::Technician,
        Method::POST,
        "/api/v1/used-items",
        Some(json!({ "item_id": id, "work_order": 1 })),
    )
    .await;

    let inbox = app
        .request_as(Role::Superuser, Method::GET, "/api/v1/notifications", None)
        .await
        .json();
    assert_eq!(inbox["data"][0]["subject"], "Low Stock Alert");
    assert_eq!(
        inbox["data"][0]["message"],
        "Panduit, PLT2S PLT2S-C is low in stock. 0 left."
    );
}

#[tokio::test]
async fn out_of_stock_items_cannot_be_used() {
    let app = TestApp::new().await;
    let id = item_with_quantity(&app, 0).await;

    let response = app
        .request_as(
            Role::Superuser,
            Method::POST,
            "/api/v1/used-items",
            Some(json!({ "item_id": id, "work_order": 9 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["message"]
        .as_str()
        .unwrap()
        .contains("Cannot use item with quantity 0."));

    let listed = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/used-items", None)
        .await;
    assert_eq!(listed.json()["pagination"]["total"], 0);
}

#[tokio::test]
async fn work_order_must_be_positive() {
    let app = TestApp::new().await;
    let id = item_with_quantity(&app, 3).await;

    let response = app
        .request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/used-items",
            Some(json!({ "item_id": id, "work_order": 0 })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["details"]["work_order"].is_array());
}

#[tokio::test]
async fn used_items_filter_by_work_order_and_delete() {
    let app = TestApp::new().await;
    let id = item_with_quantity(&app, 5).await;
    for work_order in [10, 10, 20] {
        app.request_as(
            Role::Technician,
            Method::POST,
            "/api/v1/used-items",
            Some(json!({ "item_id": id, "work_order": work_order })),
        )
        .await;
    }

    let filtered = app
        .request_as(Role::Intern, Method::GET, "/api/v1/used-items?work_order=10", None)
        .await
        .json();
    assert_eq!(filtered["pagination"]["total"], 2);

    let used_id = filtered["data"][0]["id"].as_i64().unwrap();
    let deleted = app
        .request_as(
            Role::Technician,
            Method::DELETE,
            &format!("/api/v1/used-items/{}", used_id),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let missing = app
        .request_as(
            Role::Intern,
            Method::GET,
            &format!("/api/v1/used-items/{}", used_id),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_item_drops_its_usage_records() {
    let app = TestApp::new().await;
    let id = item_with_quantity(&app, 5).await;
    app.request_as(
        Role::Technician,
        Method::POST,
        "/api/v1/used-items",
        Some(json!({ "item_id": id, "work_order": 3 })),
    )
    .await;

    let deleted = app
        .request_as(
            Role::Superuser,
            Method::DELETE,
            &format!("/api/v1/items/{}", id),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/used-items", None)
        .await
        .json();
    assert_eq!(listed["pagination"]["total"], 0);
}

#[tokio::test]
async fn used_items_search_by_work_order_and_item_text() {
    let app = TestApp::new().await;
    let panduit = item_with_quantity(&app, 5).await;
    let fluke = app
        .create_item(json!({ "manufacturer": "Fluke", "model": "87V", "quantity": 5 }))
        .await["id"]
        .as_i64()
        .unwrap();
    for (item_id, work_order) in [(panduit, 30), (fluke, 12), (panduit, 12)] {
        let used = app
            .request_as(
                Role::Technician,
                Method::POST,
                "/api/v1/used-items",
                Some(json!({ "item_id": item_id, "work_order": work_order })),
            )
            .await;
        assert_eq!(used.status, StatusCode::CREATED);
    }

    let by_work_order = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/used-items/search?q=12", None)
        .await;
    assert_eq!(by_work_order.status, StatusCode::OK);
    let body = by_work_order.json();
    assert_eq!(body["pagination"]["total"], 2);
    assert_eq!(body["data"][0]["item_id"], panduit);
    assert_eq!(body["data"][1]["item_id"], fluke);

    let by_item = app
        .request_as(Role::Intern, Method::GET, "/api/v1/used-items/search?q=PANDUIT", None)
        .await
        .json();
    assert_eq!(by_item["pagination"]["total"], 2);
    assert_eq!(by_item["data"][0]["work_order"], 12);
    assert_eq!(by_item["data"][1]["work_order"], 30);

    let both = app
        .request_as(
            Role::Intern,
            Method::GET,
            "/api/v1/used-items/search?q=panduit%2030",
            None,
        )
        .await
        .json();
    assert_eq!(both["pagination"]["total"], 1);
    assert_eq!(both["data"][0]["work_order"], 30);

    for query in ["", "fluke%2030", "milwaukee"] {
        let empty = app
            .request_as(
                Role::Viewer,
                Method::GET,
                &format!("/api/v1/used-items/search?q={}", query),
                None,
            )
            .await
            .json();
        assert_eq!(empty["pagination"]["total"], 0, "{query}");
    }
}
