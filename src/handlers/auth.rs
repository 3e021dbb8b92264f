use crate::{
    auth::{AuthError, AuthUser, RbacService},
    errors::ServiceError,
    handlers::common::success_response,
    services::users::UserResponse,
    AppState,
};
use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

/// Login request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "tech1")]
    pub username: String,
    pub password: String,
}

/// Token response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub access_token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CurrentUserResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Operation tags the caller's role grants
    pub permissions: Vec<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Unknown username or wrong password")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let user = state
        .auth
        .authenticate(payload.username.trim(), &payload.password)
        .await?;
    let issued = state.auth.generate_token(&user)?;

    info!(user_id = user.id, role = %user.role, "user logged in");
    Ok(success_response(LoginResponse {
        access_token: issued.access_token,
        token_type: issued.token_type,
        expires_in: issued.expires_in,
        user: user.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "The caller", body = CurrentUserResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, ServiceError> {
    let model = state.services.users.get(user.id).await?;
    let permissions = RbacService::new().permissions_for(model.role);
    Ok(success_response(CurrentUserResponse {
        user: model.into(),
        permissions,
    }))
}
