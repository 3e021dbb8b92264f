use crate::{
    errors::ServiceError,
    handlers::common::success_response,
    services::purchase_orders::{
        PurchaseOrderLine, PurchaseOrderRequest, EXPORT_FILE_NAME, XLSX_CONTENT_TYPE,
    },
    AppState,
};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PrefillParams {
    pub item_id: i32,
}

#[utoipa::path(
    post,
    path = "/api/v1/purchase-orders/export",
    request_body = PurchaseOrderRequest,
    responses(
        (status = 200, description = "Workbook attachment", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 400, description = "Per-line errors keyed lines[i].field", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "purchase-orders"
)]
pub async fn export_purchase_order(
    State(state): State<AppState>,
    Json(payload): Json<PurchaseOrderRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let services = state.services.purchase_orders.clone();
    // Workbook rendering is CPU-bound.
    let bytes = tokio::task::spawn_blocking(move || services.export(&payload))
        .await
        .map_err(|e| ServiceError::InternalError(e.to_string()))??;

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME),
            ),
        ],
        bytes,
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/purchase-orders/prefill",
    params(PrefillParams),
    responses(
        (status = 200, description = "One line built from the item", body = PurchaseOrderLine),
        (status = 404, description = "Item not found", body = crate::errors::ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "purchase-orders"
)]
pub async fn prefill_line(
    State(state): State<AppState>,
    Query(params): Query<PrefillParams>,
) -> Result<impl IntoResponse, ServiceError> {
    let line = state.services.purchase_orders.prefill(params.item_id).await?;
    Ok(success_response(line))
}
