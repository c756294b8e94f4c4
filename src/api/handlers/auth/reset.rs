//! Password reset endpoints.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::email;

use super::password::hash_password;
use super::state::AuthState;
use super::storage::{consume_reset_token, find_user_by_email, store_reset_token};
use super::types::{
    MessageResponse, PasswordResetConfirmRequest, PasswordResetRequest, UserResponse,
};
use super::utils::{generate_secret_token, hash_secret_token, normalize_email, valid_password};

const RESET_REQUEST_MESSAGE: &str =
    "If your email is registered, a password reset link has been sent";

/// Start a password reset.
///
/// The response is identical whether or not the email is registered, so the
/// endpoint cannot be used to enumerate accounts.
#[utoipa::path(
    post,
    path = "/auth/reset-password-request",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Reset acknowledged", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn request_password_reset(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<PasswordResetRequest>>,
) -> impl IntoResponse {
    let request: PasswordResetRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    // Generate the token up front so known and unknown emails do the same work.
    let token = match generate_secret_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate reset token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password reset failed".to_string(),
            )
                .into_response();
        }
    };
    let token_hash = hash_secret_token(&token);

    let email_normalized = normalize_email(&request.email);
    let user = match find_user_by_email(&pool, &email_normalized).await {
        Ok(Some(user)) => user,
        Ok(None) => return generic_acknowledgment(),
        Err(err) => {
            error!("Failed to lookup user for password reset: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password reset failed".to_string(),
            )
                .into_response();
        }
    };

    let config = auth_state.config();
    match store_reset_token(&pool, user.id, &token_hash, config.reset_token_ttl_minutes()).await {
        Ok(true) => {}
        Ok(false) => return generic_acknowledgment(),
        Err(err) => {
            error!("Failed to store reset token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password reset failed".to_string(),
            )
                .into_response();
        }
    }

    let message = email::password_reset_message(
        config.frontend_base_url(),
        &user.email,
        &user.full_name,
        &token,
        config.reset_token_ttl_minutes(),
    );
    let _ = email::deliver(auth_state.email_sender(), message);

    generic_acknowledgment()
}

fn generic_acknowledgment() -> axum::response::Response {
    (
        StatusCode::OK,
        Json(MessageResponse {
            message: RESET_REQUEST_MESSAGE.to_string(),
        }),
    )
        .into_response()
}

/// Complete a password reset by consuming the token and installing the new hash.
#[utoipa::path(
    post,
    path = "/auth/reset-password-confirm",
    request_body = PasswordResetConfirmRequest,
    responses(
        (status = 200, description = "Password reset", body = UserResponse),
        (status = 400, description = "Invalid or expired token, or weak password", body = String)
    ),
    tag = "auth"
)]
pub async fn confirm_password_reset(
    pool: Extension<PgPool>,
    payload: Option<Json<PasswordResetConfirmRequest>>,
) -> impl IntoResponse {
    let request: PasswordResetConfirmRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let token = request.token.trim();
    if token.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    }
    if !valid_password(&request.new_password) {
        return (
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters".to_string(),
        )
            .into_response();
    }

    let new_password_hash = match hash_password(&request.new_password) {
        Ok(digest) => digest,
        Err(err) => {
            error!("Failed to hash new password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password reset failed".to_string(),
            )
                .into_response();
        }
    };

    let token_hash = hash_secret_token(token);
    match consume_reset_token(&pool, &token_hash, &new_password_hash).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user.to_response())).into_response(),
        // Unknown and expired tokens are indistinguishable to the caller.
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            "Invalid or expired password reset token".to_string(),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to confirm password reset: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Password reset failed".to_string(),
            )
                .into_response()
        }
    }
}
