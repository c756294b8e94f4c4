//! Email verification endpoints.

use axum::{
    extract::{Extension, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::email;

use super::state::AuthState;
use super::storage::{consume_verification_token, find_user_by_email, store_verification_token};
use super::types::{MessageResponse, ResendVerificationRequest, UserResponse, VerifyEmailParams};
use super::utils::{generate_secret_token, hash_secret_token, normalize_email};

/// Verify the email link by consuming the token and activating the account.
#[utoipa::path(
    get,
    path = "/auth/verify-email",
    params(VerifyEmailParams),
    responses(
        (status = 200, description = "Email verified", body = UserResponse),
        (status = 400, description = "Invalid or expired token", body = String)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    pool: Extension<PgPool>,
    params: Option<Query<VerifyEmailParams>>,
) -> impl IntoResponse {
    let Some(Query(params)) = params else {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    };

    let token = params.token.trim();
    if token.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    }

    // Only the hash is stored; the raw token never reaches the database.
    let token_hash = hash_secret_token(token);
    match consume_verification_token(&pool, &token_hash).await {
        Ok(Some(user)) => (StatusCode::OK, Json(user.to_response())).into_response(),
        // Unknown and expired tokens are indistinguishable to the caller.
        Ok(None) => (
            StatusCode::BAD_REQUEST,
            "Invalid or expired verification token".to_string(),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to verify email: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Verification failed".to_string(),
            )
                .into_response()
        }
    }
}

/// Resend a verification email, overwriting any outstanding token.
#[utoipa::path(
    post,
    path = "/auth/resend-verification-email",
    request_body = ResendVerificationRequest,
    responses(
        (status = 200, description = "Verification email resent", body = MessageResponse),
        (status = 400, description = "Email already verified", body = String),
        (status = 404, description = "User not found", body = String)
    ),
    tag = "auth"
)]
pub async fn resend_verification_email(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<ResendVerificationRequest>>,
) -> impl IntoResponse {
    let request: ResendVerificationRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    let user = match find_user_by_email(&pool, &email).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return (StatusCode::NOT_FOUND, "User not found".to_string()).into_response()
        }
        Err(err) => {
            error!("Failed to lookup user for resend: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Resend failed".to_string(),
            )
                .into_response();
        }
    };

    if user.verified {
        return (StatusCode::BAD_REQUEST, "Email already verified".to_string()).into_response();
    }

    let token = match generate_secret_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate verification token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Resend failed".to_string(),
            )
                .into_response();
        }
    };
    let token_hash = hash_secret_token(&token);

    let config = auth_state.config();
    match store_verification_token(
        &pool,
        user.id,
        &token_hash,
        config.verification_token_ttl_minutes(),
    )
    .await
    {
        Ok(true) => {}
        Ok(false) => {
            // The account disappeared between lookup and update.
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to update verification token".to_string(),
            )
                .into_response();
        }
        Err(err) => {
            error!("Failed to store verification token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Resend failed".to_string(),
            )
                .into_response();
        }
    }

    let message = email::verification_message(
        config.frontend_base_url(),
        &user.email,
        &user.full_name,
        &token,
        config.verification_token_ttl_minutes(),
    );
    let _ = email::deliver(auth_state.email_sender(), message);

    (
        StatusCode::OK,
        Json(MessageResponse {
            message: "Verification email resent successfully".to_string(),
        }),
    )
        .into_response()
}
