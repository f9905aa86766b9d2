//! Signup and login endpoints

use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::user::{LoginRequest, SignupRequest},
    AppState,
};

use super::{guards::bearer_token, AppJson};

/// Token issued on signup or login
#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub message: String,
    pub token: String,
}

/// Register a new account and log it in
#[utoipa::path(
    post,
    path = "/auth/signup",
    tag = "auth",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = TokenResponse),
        (status = 400, description = "User already exists or invalid input", body = ErrorResponse)
    )
)]
pub async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> AppResult<(StatusCode, Json<TokenResponse>)> {
    let token = state.services.users.signup(request).await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            message: "User registered successfully".to_string(),
            token,
        }),
    ))
}

/// Log in with email and password.
/// A request that already carries a valid token gets that token back.
#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    AppJson(request): AppJson<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    if let Some(token) = bearer_token(&headers) {
        if state.services.tokens.verify(token).is_ok() {
            return Ok(Json(TokenResponse {
                message: "User already logged in".to_string(),
                token: token.to_string(),
            }));
        }
    }

    let token = state.services.users.login(request).await?;

    Ok(Json(TokenResponse {
        message: "Login successful".to_string(),
        token,
    }))
}
