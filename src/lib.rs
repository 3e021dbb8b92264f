//! Inventory Tracker
//!
//! Items, item requests, purchase orders and notifications behind a role table,
//! with an embedded full-text index over the item catalogue.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware_helpers;
pub mod migrator;
pub mod openapi;
pub mod services;
pub mod tracing;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    routing::{delete, get, patch, post},
    Router,
};
use http::HeaderValue;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer};

use crate::auth::{AuthRouterExt, AuthService, Operation};
use crate::logging::LoggingState;
use crate::services::search::SearchIndex;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub auth: Arc<AuthService>,
    pub search: Arc<SearchIndex>,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(
        db: Arc<DatabaseConnection>,
        config: config::AppConfig,
        search: Arc<SearchIndex>,
    ) -> Self {
        let auth = Arc::new(AuthService::new(
            auth::AuthConfig::from_app_config(&config),
            db.clone(),
        ));
        let services = handlers::AppServices::new(db.clone(), search.clone(), &config);
        Self {
            db,
            config,
            auth,
            search,
            services,
        }
    }
}

/// Every `/api/v1` route. Each group carries the operation its role gate checks.
pub fn api_v1_routes() -> Router<AppState> {
    use handlers::{item_requests, items, notifications, purchase_orders, used_items, users};

    let auth_public = Router::new().route("/auth/login", post(handlers::auth::login));
    let auth_me = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .with_auth();

    // Items
    let items_read = Router::new()
        .route("/items", get(items::list_items))
        .route("/items/search", get(items::search_items))
        .route("/items/:id", get(items::get_item))
        .with_permission(Operation::ItemsRead);

    let items_create = Router::new()
        .route("/items", post(items::create_item))
        .with_permission(Operation::ItemsCreate);

    // Field-level gates run in the service.
    let items_update = Router::new()
        .route("/items/:id", patch(items::update_item))
        .with_auth();

    let items_delete = Router::new()
        .route("/items/:id", delete(items::delete_item))
        .with_permission(Operation::ItemsDelete);

    let items_import = Router::new()
        .route("/items/import", post(items::import_items))
        .with_permission(Operation::ItemsImport);

    let items_history = Router::new()
        .route("/items/:id/history", get(items::item_history))
        .with_permission(Operation::ItemsHistory);

    // Used items
    let used_read = Router::new()
        .route("/used-items", get(used_items::list_used_items))
        .route("/used-items/search", get(used_items::search_used_items))
        .route("/used-items/:id", get(used_items::get_used_item))
        .with_permission(Operation::UsedItemsRead);

    let used_create = Router::new()
        .route("/used-items", post(used_items::create_used_item))
        .with_permission(Operation::UsedItemsCreate);

    let used_delete = Router::new()
        .route("/used-items/:id", delete(used_items::delete_used_item))
        .with_permission(Operation::UsedItemsDelete);

    // Item requests
    let requests_read = Router::new()
        .route("/item-requests", get(item_requests::list_requests))
        .route("/item-requests/:id", get(item_requests::get_request))
        .with_permission(Operation::RequestsRead);

    let requests_create = Router::new()
        .route("/item-requests", post(item_requests::create_request))
        .with_permission(Operation::RequestsCreate);

    let requests_review = Router::new()
        .route("/item-requests/:id/accept", post(item_requests::accept_request))
        .route("/item-requests/:id/reject", post(item_requests::reject_request))
        .with_permission(Operation::RequestsReview);

    let requests_delete = Router::new()
        .route("/item-requests/:id", delete(item_requests::delete_request))
        .with_permission(Operation::RequestsDelete);

    // Users
    let users_manage = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:id",
            get(users::get_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .with_permission(Operation::UsersManage);

    // Notifications
    let notifications_read = Router::new()
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/unread-count",
            get(notifications::unread_count),
        )
        .with_permission(Operation::NotificationsRead);

    let notifications_manage = Router::new()
        .route("/notifications/read-all", post(notifications::mark_all_read))
        .route("/notifications/:id/read", post(notifications::mark_read))
        .route(
            "/notifications/:id",
            delete(notifications::delete_notification),
        )
        .with_permission(Operation::NotificationsManage);

    // Purchase orders
    let purchase_orders = Router::new()
        .route(
            "/purchase-orders/export",
            post(purchase_orders::export_purchase_order),
        )
        .route("/purchase-orders/prefill", get(purchase_orders::prefill_line))
        .with_permission(Operation::PurchaseOrdersExport);

    Router::new()
        .merge(auth_public)
        .merge(auth_me)
        .merge(items_read)
        .merge(items_create)
        .merge(items_update)
        .merge(items_delete)
        .merge(items_import)
        .merge(items_history)
        .merge(used_read)
        .merge(used_create)
        .merge(used_delete)
        .merge(requests_read)
        .merge(requests_create)
        .merge(requests_review)
        .merge(requests_delete)
        .merge(users_manage)
        .merge(notifications_read)
        .merge(notifications_manage)
        .merge(purchase_orders)
}

/// Makes the [`AuthService`] reachable from `auth_middleware`.
async fn inject_auth_service(
    State(auth): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Response {
    request.extensions_mut().insert(auth);
    next.run(request).await
}

fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();
    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

/// The complete application: health, `/api/v1`, Swagger UI and the middleware stack.
pub fn app_router(state: AppState, logging: Arc<LoggingState>) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let cors = cors_layer(&state.config);
    let auth = state.auth.clone();

    Router::<AppState>::new()
        .route("/health", get(handlers::health::health))
        .nest("/api/v1", api_v1_routes())
        .merge(openapi::swagger_ui())
        .layer(TimeoutLayer::new(timeout))
        .layer(tracing::configure_http_tracing())
        .layer(cors)
        .layer(axum::middleware::from_fn_with_state(
            logging,
            logging::logging_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(auth, inject_auth_service))
        // Outermost, so every layer and error body sees the request id.
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id_middleware,
        ))
        .with_state(state)
}
