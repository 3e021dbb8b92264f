use crate::{
    auth::AuthUser,
    entities::item_history,
    errors::ServiceError,
    handlers::common::{
        created_response, no_content_response, success_response, PaginatedResponse,
        PaginationParams,
    },
    services::{
        import::parse_items,
        items::{ItemFilter, ItemInput, ItemResponse},
    },
    AppState,
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Free-text query
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<ItemResponse>,
    pub total: usize,
    /// Corrected query when a term looks misspelled
    pub suggestion: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ImportResponse {
    pub imported: usize,
    pub items: Vec<ItemResponse>,
}

#[utoipa::path(
    get,
    path = "/api/v1/items",
    params(PaginationParams, ItemFilter),
    responses(
        (status = 200, description = "Items listed", body = PaginatedResponse<ItemResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn list_items(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(filter): Query<ItemFilter>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.normalized();
    let (items, total) = state.services.items.list(&filter, page, per_page).await?;
    let data = items.into_iter().map(ItemResponse::from).collect();
    Ok(success_response(PaginatedResponse::new(
        data, page, per_page, total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matches in relevance order", body = SearchResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn search_items(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let outcome = state.services.items.search(&params.q).await?;
    let results: Vec<ItemResponse> = outcome.items.into_iter().map(ItemResponse::from).collect();
    Ok(success_response(SearchResponse {
        query: params.q,
        total: results.len(),
        results,
        suggestion: outcome.suggestion,
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item fetched", body = ItemResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.items.get(id).await?;
    Ok(success_response(ItemResponse::from(item)))
}

#[utoipa::path(
    post,
    path = "/api/v1/items",
    request_body = ItemInput,
    responses(
        (status = 201, description = "Item created", body = ItemResponse),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse),
        (status = 403, description = "Role may not set these fields", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.items.create(&user, payload).await?;
    Ok(created_response(ItemResponse::from(item)))
}

#[utoipa::path(
    patch,
    path = "/api/v1/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    request_body = ItemInput,
    responses(
        (status = 200, description = "Item updated", body = ItemResponse),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse),
        (status = 403, description = "Role may not change these fields", body = crate::errors::ErrorResponse),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
    Json(payload): Json<ItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.items.update(&user, id, payload).await?;
    Ok(success_response(ItemResponse::from(item)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/items/{id}",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.items.delete(&user, id).await?;
    Ok(no_content_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/items/{id}/history",
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "History, newest first", body = Vec<item_history::Model>),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn item_history(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let rows = state.services.items.history(id).await?;
    Ok(success_response(rows))
}

#[utoipa::path(
    post,
    path = "/api/v1/items/import",
    request_body(content = Vec<u8>, content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    responses(
        (status = 201, description = "All rows imported", body = ImportResponse),
        (status = 400, description = "Unreadable workbook or per-row errors", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn import_items(
    State(state): State<AppState>,
    user: AuthUser,
    body: Bytes,
) -> Result<impl IntoResponse, ServiceError> {
    if body.is_empty() {
        return Err(ServiceError::SpreadsheetError(
            "Upload an .xlsx workbook as the request body".to_string(),
        ));
    }
    let rows = parse_items(&body)?;
    let saved = state.services.items.import(&user, rows).await?;
    Ok(created_response(ImportResponse {
        imported: saved.len(),
        items: saved.into_iter().map(ItemResponse::from).collect(),
    }))
}
