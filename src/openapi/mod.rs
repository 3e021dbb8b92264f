use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory Tracker API",
        version = "1.0.0",
        description = r#"
# Inventory Tracker

Items, item requests, purchase orders and notifications for a single organization.

## Authentication

Log in at `POST /api/v1/auth/login` and send the token on every other call:

```
Authorization: Bearer <access_token>
```

## Roles

Superuser, Technician, Intern and Viewer. `GET /api/v1/auth/me` lists the operation tags
the caller's role grants. Interns may change item quantities only; Viewers are read-only.

## Errors

```json
{
  "error": "Bad Request",
  "message": "Validation failed",
  "details": {"quantity": ["must be zero or greater"]},
  "request_id": "5f0c...",
  "timestamp": "2024-01-01T00:00:00Z"
}
```

## Pagination

List endpoints take `page` (default 1) and `per_page` (default 20, max 100).
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login and the current user"),
        (name = "items", description = "Inventory items, search, history and import"),
        (name = "used-items", description = "Units taken out of stock for work orders"),
        (name = "item-requests", description = "Requests for new or restocked items"),
        (name = "users", description = "User administration"),
        (name = "notifications", description = "The caller's notifications"),
        (name = "purchase-orders", description = "Purchase order workbook export"),
        (name = "health", description = "Health check")
    ),
    paths(
        handlers::auth::login,
        handlers::auth::me,
        handlers::items::list_items,
        handlers::items::search_items,
        handlers::items::get_item,
        handlers::items::create_item,
        handlers::items::update_item,
        handlers::items::delete_item,
        handlers::items::item_history,
        handlers::items::import_items,
        handlers::used_items::list_used_items,
        handlers::used_items::search_used_items,
        handlers::used_items::get_used_item,
        handlers::used_items::create_used_item,
        handlers::used_items::delete_used_item,
        handlers::item_requests::list_requests,
        handlers::item_requests::get_request,
        handlers::item_requests::create_request,
        handlers::item_requests::accept_request,
        handlers::item_requests::reject_request,
        handlers::item_requests::delete_request,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::notifications::list_notifications,
        handlers::notifications::unread_count,
        handlers::notifications::mark_read,
        handlers::notifications::mark_all_read,
        handlers::notifications::delete_notification,
        handlers::purchase_orders::export_purchase_order,
        handlers::purchase_orders::prefill_line,
        handlers::health::health,
    ),
    components(
        schemas(
            crate::entities::user::Role,
            crate::entities::item::PartOrUnit,
            crate::entities::item_request::RequestStatus,
            crate::entities::item_history::HistoryAction,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_document_lists_routes_and_bearer_scheme() {
        let openapi = ApiDocV1::openapi();
        let json = serde_json::to_string_pretty(&openapi).unwrap();
        assert!(json.contains("Inventory Tracker API"));
        assert!(json.contains("/api/v1/items/search"));
        assert!(json.contains("/api/v1/notifications/unread-count"));
        assert!(json.contains("bearer_auth"));
    }
}
