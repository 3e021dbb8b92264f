mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use inventory_tracker::entities::user::Role;
use rust_xlsxwriter::Workbook;
use serde_json::json;

fn multimeter() -> serde_json::Value {
    json!({
        "manufacturer": "Fluke",
        "model": "87V",
        "part_number": "FL-87",
        "description": "True RMS multimeter",
        "location": "Shelf A",
        "quantity": 5,
        "min_quantity": 2,
        "unit_price": "149.99"
    })
}

#[tokio::test]
async fn create_fills_defaults_for_missing_fields() {
    let app = TestApp::new().await;
    let item = app.create_item(json!({ "manufacturer": "Omega" })).await;

    assert_eq!(item["manufacturer"], "Omega");
    assert_eq!(item["model"], "N/A");
    assert_eq!(item["part_or_unit"], "Part");
    assert_eq!(item["location"], "N/A");
    assert_eq!(item["quantity"], 0);
    assert_eq!(item["unit_price"], "0.01");
    assert_eq!(item["last_modified_by"], app.user_id(Role::Superuser));
}

#[tokio::test]
async fn create_get_update_delete_round_trip() {
    let app = TestApp::new().await;
    let created = app.create_item(multimeter()).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["low_stock"], false);

    let fetched = app
        .request_as(Role::Viewer, Method::GET, &format!("/api/v1/items/{}", id), None)
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.json()["part_number"], "FL-87");

    let updated = app
        .request_as(
            Role::Technician,
            Method::PATCH,
            &format!("/api/v1/items/{}", id),
            Some(json!({ "location": "Shelf B", "quantity": 1 })),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK, "{:?}", updated.json());
    let body = updated.json();
    assert_eq!(body["location"], "Shelf B");
    assert_eq!(body["low_stock"], true);
    assert_eq!(body["last_modified_by"], app.user_id(Role::Technician));

    let deleted = app
        .request_as(
            Role::Technician,
            Method::DELETE,
            &format!("/api/v1/items/{}", id),
            None,
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let gone = app
        .request_as(Role::Viewer, Method::GET, &format!("/api/v1/items/{}", id), None)
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn history_lists_changes_newest_first() {
    let app = TestApp::new().await;
    let id = app.create_item(multimeter()).await["id"].as_i64().unwrap();

    app.request_as(
        Role::Superuser,
        Method::PATCH,
        &format!("/api/v1/items/{}", id),
        Some(json!({ "quantity": 3, "unit_price": "149.99" })),
    )
    .await;

    let history = app
        .request_as(
            Role::Intern,
            Method::GET,
            &format!("/api/v1/items/{}/history", id),
            None,
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    let rows = history.json();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["action"], "update");
    // Unit price did not move, so only the quantity is described.
    assert_eq!(
        rows[0]["changes"],
        "quantity: '5' has been changed to '3'"
    );
    assert_eq!(rows[1]["action"], "create");
}

#[tokio::test]
async fn update_without_changes_writes_no_history() {
    let app = TestApp::new().await;
    let id = app.create_item(multimeter()).await["id"].as_i64().unwrap();

    let same = app
        .request_as(
            Role::Superuser,
            Method::PATCH,
            &format!("/api/v1/items/{}", id),
            Some(json!({ "quantity": 5 })),
        )
        .await;
    assert_eq!(same.status, StatusCode::OK);

    let history = app
        .request_as(
            Role::Superuser,
            Method::GET,
            &format!("/api/v1/items/{}/history", id),
            None,
        )
        .await;
    assert_eq!(history.json().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn invalid_fields_are_reported_per_field() {
    let app = TestApp::new().await;
    let response = app
        .request_as(
            Role::Superuser,
            Method::POST,
            "/api/v1/items",
            Some(json!({ "quantity": -1, "unit_price": "1.234" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let body = response.json();
    assert!(body["details"]["quantity"].is_array());
    assert!(body["details"]["unit_price"].is_array());
}

#[tokio::test]
async fn low_stock_filter_and_superuser_alert() {
    let app = TestApp::new().await;
    app.create_item(multimeter()).await;
    let mut short = multimeter();
    short["part_number"] = json!("FL-117");
    short["quantity"] = json!(1);
    app.create_item(short).await;

    let listed = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items?low_stock=true", None)
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let body = listed.json();
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["data"][0]["part_number"], "FL-117");

    let unread = app
        .request_as(
            Role::Superuser,
            Method::GET,
            "/api/v1/notifications/unread-count",
            None,
        )
        .await;
    assert_eq!(unread.json()["unread_count"], 1);

    let technician = app
        .request_as(
            Role::Technician,
            Method::GET,
            "/api/v1/notifications/unread-count",
            None,
        )
        .await;
    assert_eq!(technician.json()["unread_count"], 0);
}

#[tokio::test]
async fn pagination_caps_page_size() {
    let app = TestApp::new().await;
    app.create_item(multimeter()).await;

    let listed = app
        .request_as(
            Role::Viewer,
            Method::GET,
            "/api/v1/items?page=1&per_page=1000",
            None,
        )
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    assert_eq!(listed.json()["pagination"]["per_page"], 100);
}

#[tokio::test]
async fn search_finds_items_and_suggests_spelling() {
    let app = TestApp::new().await;
    app.create_item(multimeter()).await;
    let mut scope = multimeter();
    scope["manufacturer"] = json!("Tektronix");
    scope["model"] = json!("TBS1052");
    scope["part_number"] = json!("TK-1052");
    scope["description"] = json!("Digital oscilloscope");
    app.create_item(scope).await;

    let hit = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items/search?q=fluke", None)
        .await;
    assert_eq!(hit.status, StatusCode::OK);
    let body = hit.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["manufacturer"], "Fluke");

    let miss = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items/search?q=flike", None)
        .await;
    let body = miss.json();
    assert_eq!(body["total"], 0);
    assert_eq!(body["suggestion"], "fluke");

    let blank = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items/search?q=", None)
        .await;
    assert_eq!(blank.status, StatusCode::OK);
    assert_eq!(blank.json()["total"], 0);
}

#[tokio::test]
async fn deleted_items_leave_the_search_index() {
    let app = TestApp::new().await;
    let id = app.create_item(multimeter()).await["id"].as_i64().unwrap();

    app.request_as(
        Role::Superuser,
        Method::DELETE,
        &format!("/api/v1/items/{}", id),
        None,
    )
    .await;

    let search = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items/search?q=fluke", None)
        .await;
    assert_eq!(search.json()["total"], 0);
}

fn import_workbook(rows: &[[&str; 9]]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let header = [
        "Manufacturer",
        "Model",
        "Part or Unit",
        "Part Number",
        "Description",
        "Location",
        "Quantity",
        "Min Quantity",
        "Unit Price",
    ];
    for (col, title) in header.iter().enumerate() {
        sheet.write_string(0, col as u16, *title).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (col, value) in row.iter().enumerate() {
            sheet.write_string(r as u32 + 1, col as u16, *value).unwrap();
        }
    }
    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn import_creates_every_row() {
    let app = TestApp::new().await;
    let bytes = import_workbook(&[
        ["Fluke", "87V", "Part", "FL-87", "Meter", "A1", "4", "1", "149.99"],
        ["Keysight", "E36103B", "unit", "KS-1", "Supply", "B2", "2", "1", "550"],
    ]);

    let response = app
        .post_bytes_as(Role::Technician, "/api/v1/items/import", bytes)
        .await;
    assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.json());
    let body = response.json();
    assert_eq!(body["imported"], 2);
    assert_eq!(body["items"][1]["part_or_unit"], "Unit");

    let listed = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items", None)
        .await;
    assert_eq!(listed.json()["pagination"]["total"], 2);
}

#[tokio::test]
async fn import_with_bad_row_saves_nothing() {
    let app = TestApp::new().await;
    let bytes = import_workbook(&[
        ["Fluke", "87V", "Part", "FL-87", "Meter", "A1", "4", "1", "149.99"],
        ["Keysight", "E36103B", "Gizmo", "KS-1", "Supply", "B2", "lots", "1", "550"],
    ]);

    let response = app
        .post_bytes_as(Role::Superuser, "/api/v1/items/import", bytes)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let details = &response.json()["details"]["row 3"];
    assert_eq!(details.as_array().map(Vec::len), Some(2));

    let listed = app
        .request_as(Role::Viewer, Method::GET, "/api/v1/items", None)
        .await;
    assert_eq!(listed.json()["pagination"]["total"], 0);
}

#[tokio::test]
async fn import_rejects_non_spreadsheet_bodies() {
    let app = TestApp::new().await;
    let response = app
        .post_bytes_as(Role::Superuser, "/api/v1/items/import", b"not a workbook".to_vec())
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}
