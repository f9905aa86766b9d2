//! Self-service account endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{user::UpdateProfile, AccountProfile},
    AppState,
};

use super::{AppJson, AuthenticatedUser};

#[derive(Serialize, ToSchema)]
pub struct ProfileResponse {
    pub message: String,
    pub user: AccountProfile,
}

#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Get the current account
#[utoipa::path(
    get,
    path = "/users/profile",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current account", body = ProfileResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn profile(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<ProfileResponse>> {
    let account = state.services.users.get_by_id(identity.id).await?;

    Ok(Json(ProfileResponse {
        message: format!("Welcome, user {}", account.email),
        user: account.profile(),
    }))
}

/// Update the current account's name or password
#[utoipa::path(
    put,
    path = "/users/update",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Account updated", body = ProfileResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    AppJson(update): AppJson<UpdateProfile>,
) -> AppResult<Json<ProfileResponse>> {
    let account = state.services.users.update_profile(identity.id, update).await?;

    Ok(Json(ProfileResponse {
        message: "User updated successfully".to_string(),
        user: account.profile(),
    }))
}

/// Delete the current account. Books and loans are left in place.
#[utoipa::path(
    delete,
    path = "/users/delete",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Account deleted", body = DeleteAccountResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<DeleteAccountResponse>> {
    let deleted_count = state.services.users.delete_account(identity.id).await?;

    Ok(Json(DeleteAccountResponse {
        message: "User deleted successfully".to_string(),
        deleted_count,
    }))
}

/// Log out. Tokens are not revoked; the client drops its copy.
#[utoipa::path(
    post,
    path = "/users/logout",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse)
    )
)]
pub async fn logout(AuthenticatedUser(identity): AuthenticatedUser) -> Json<MessageResponse> {
    tracing::info!("User {} logged out", identity.email);

    Json(MessageResponse {
        message: "Logged out successfully, discard your token".to_string(),
    })
}
