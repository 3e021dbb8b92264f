use crate::{
    auth::AuthUser,
    entities::item_request::{self, RequestStatus},
    errors::ServiceError,
    handlers::common::{
        created_response, no_content_response, success_response, PaginatedResponse,
        PaginationParams,
    },
    services::item_requests::CreateItemRequest,
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/item-requests",
    params(PaginationParams),
    responses(
        (status = 200, description = "Requests, oldest first", body = PaginatedResponse<item_request::Model>)
    ),
    security(("bearer_auth" = [])),
    tag = "item-requests"
)]
pub async fn list_requests(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = pagination.normalized();
    let (rows, total) = state.services.item_requests.list(page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        rows, page, per_page, total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/item-requests/{id}",
    params(("id" = i32, Path, description = "Item request ID")),
    responses(
        (status = 200, description = "Request fetched", body = item_request::Model),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "item-requests"
)]
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(state.services.item_requests.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/api/v1/item-requests",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Request submitted; Superusers notified", body = item_request::Model),
        (status = 400, description = "Invalid fields", body = crate::errors::ErrorResponse),
        (status = 404, description = "Referenced item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "item-requests"
)]
pub async fn create_request(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let saved = state.services.item_requests.create(&user, payload).await?;
    Ok(created_response(saved))
}

#[utoipa::path(
    post,
    path = "/api/v1/item-requests/{id}/accept",
    params(("id" = i32, Path, description = "Item request ID")),
    responses(
        (status = 200, description = "Accepted; requester notified", body = item_request::Model),
        (status = 409, description = "Already reviewed", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "item-requests"
)]
pub async fn accept_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let saved = state
        .services
        .item_requests
        .review(&user, id, RequestStatus::Accepted)
        .await?;
    Ok(success_response(saved))
}

#[utoipa::path(
    post,
    path = "/api/v1/item-requests/{id}/reject",
    params(("id" = i32, Path, description = "Item request ID")),
    responses(
        (status = 200, description = "Rejected; requester notified", body = item_request::Model),
        (status = 409, description = "Already reviewed", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "item-requests"
)]
pub async fn reject_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    let saved = state
        .services
        .item_requests
        .review(&user, id, RequestStatus::Rejected)
        .await?;
    Ok(success_response(saved))
}

#[utoipa::path(
    delete,
    path = "/api/v1/item-requests/{id}",
    params(("id" = i32, Path, description = "Item request ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Not the requester", body = crate::errors::ErrorResponse),
        (status = 404, description = "Not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "item-requests"
)]
pub async fn delete_request(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.item_requests.delete(&user, id).await?;
    Ok(no_content_response())
}
