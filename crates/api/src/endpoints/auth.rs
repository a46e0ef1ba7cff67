//! Authentication endpoints.

use axum::{Json, Router, extract::State, http::StatusCode, routing::{get, post}};
use reelhub_common::AppResult;
use reelhub_core::account::{PasswordResetRequested, RegisterInput};
use reelhub_db::entities::user::{self, UserRole};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public projection of a user account. Never carries the password
/// hash; the email only appears on the owner's own responses.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub pseudo: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub favorite_genres: Vec<String>,
    pub role: UserRole,
    pub created_at: String,
}

impl UserResponse {
    /// Projection for the account's owner (includes the email).
    #[must_use]
    pub fn for_owner(u: &user::Model) -> Self {
        Self {
            id: u.id.clone(),
            email: Some(u.email.clone()),
            pseudo: u.pseudo.clone(),
            avatar_url: u.avatar_url.clone(),
            bio: u.bio.clone(),
            favorite_genres: u.favorite_genres_list(),
            role: u.role,
            created_at: u.created_at.to_rfc3339(),
        }
    }

    /// Projection for other viewers (no email).
    #[must_use]
    pub fn public(u: &user::Model) -> Self {
        Self {
            email: None,
            ..Self::for_owner(u)
        }
    }
}

/// Register request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub pseudo: String,
}

/// Auth response carrying a fresh token.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> AppResult<(StatusCode, ApiResponse<AuthResponse>)> {
    let input = RegisterInput {
        email: req.email,
        password: req.password,
        pseudo: req.pseudo,
    };

    let (user, token) = state.account_service.register(input).await?;

    Ok(ApiResponse::created(AuthResponse {
        token,
        user: UserResponse::for_owner(&user),
    }))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in to an existing account.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let (user, token) = state.account_service.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(AuthResponse {
        token,
        user: UserResponse::for_owner(&user),
    }))
}

/// Password reset request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Start a password reset. The response is the same whether or not
/// the email exists.
async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> AppResult<ApiResponse<PasswordResetRequested>> {
    let outcome = state
        .account_service
        .request_password_reset(&req.email)
        .await?;

    Ok(ApiResponse::ok(outcome))
}

/// Password reset completion request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,
    pub new_password: String,
}

/// Reset confirmation response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    pub message: String,
}

/// Complete a password reset with a previously issued token.
async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> AppResult<ApiResponse<ResetPasswordResponse>> {
    state
        .account_service
        .reset_password(&req.token, &req.new_password)
        .await?;

    Ok(ApiResponse::ok(ResetPasswordResponse {
        message: "Password has been reset".to_string(),
    }))
}

/// Verify response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub valid: bool,
    pub user: UserResponse,
}

/// Return the authenticated account behind the presented token.
async fn verify(AuthUser(user): AuthUser) -> AppResult<ApiResponse<VerifyResponse>> {
    Ok(ApiResponse::ok(VerifyResponse {
        valid: true,
        user: UserResponse::for_owner(&user),
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/request-password-reset", post(request_password_reset))
        .route("/reset-password", post(reset_password))
        .route("/verify", get(verify))
}
