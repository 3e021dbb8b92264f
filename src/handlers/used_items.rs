use crate::{
    auth::AuthUser,
    entities::used_item,
    errors::ServiceError,
    handlers::common::{
        created_response, no_content_response, success_response, PaginatedResponse,
        PaginationParams,
    },
    services::items::UseItemInput,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsedItemFilter {
    pub work_order: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/used-items",
    params(PaginationParams, UsedItemFilter),
    responses(
        (status = 200, description = "Usage records, newest first", body = PaginatedResponse<used_item::Model>)
    ),
    security(("bearer_auth" = [])),
    tag = "used-items"
)]
pub async fn list_used_items(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<UsedItemFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.normalized();
    let (rows, total) = state
        .services
        .items
        .list_used(filter.work_order, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UsedItemSearchParams {
    /// Work order numbers and item text
    #[serde(default)]
    pub q: String,
}

#[utoipa::path(
    get,
    path = "/api/v1/used-items/search",
    params(PaginationParams, UsedItemSearchParams),
    responses(
        (status = 200, description = "Matching usage records by work order, then item", body = PaginatedResponse<used_item::Model>)
    ),
    security(("bearer_auth" = [])),
    tag = "used-items"
)]
pub async fn search_used_items(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<UsedItemSearchParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.normalized();
    let (rows, total) = state
        .services
        .items
        .search_used(&params.q, page, per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/used-items/{id}",
    params(("id" = i32, Path, description = "Used item ID")),
    responses(
        (status = 200, description = "Usage record", body = used_item::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "used-items"
)]
pub async fn get_used_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.items.get_used(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/used-items",
    request_body = UseItemInput,
    responses(
        (status = 201, description = "One unit taken out of stock", body = used_item::Model),
        (status = 400, description = "Item is out of stock", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "used-items"
)]
pub async fn create_used_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<UseItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let used = state.services.items.use_item(&user, payload).await?;
    Ok(created_response(used))
}

#[utoipa::path(
    delete,
    path = "/api/v1/used-items/{id}",
    params(("id" = i32, Path, description = "Used item ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "used-items"
)]
pub async fn delete_used_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.items.delete_used(id).await?;
    Ok(no_content_response())
}
