//! Registration endpoint.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use crate::api::email;

use super::password::hash_password;
use super::state::AuthState;
use super::storage::{insert_user, NewUser, RegisterOutcome};
use super::types::{RegisterRequest, Role, UserResponse};
use super::utils::{
    generate_secret_token, hash_secret_token, normalize_email, valid_email, valid_password,
};

/// Register a new account and dispatch the verification email.
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = UserResponse),
        (status = 400, description = "Invalid email, password, or name", body = String),
        (status = 409, description = "Email already registered", body = String)
    ),
    tag = "auth"
)]
pub async fn register(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request: RegisterRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (StatusCode::BAD_REQUEST, "Invalid email address".to_string()).into_response();
    }
    if !valid_password(&request.password) {
        return (
            StatusCode::BAD_REQUEST,
            "Password must be at least 8 characters".to_string(),
        )
            .into_response();
    }
    let full_name = request.full_name.trim();
    if full_name.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing full name".to_string()).into_response();
    }

    // Caller-supplied roles are stored as-is, admin included.
    let role = request.role.unwrap_or(Role::Student);

    let password_hash = match hash_password(&request.password) {
        Ok(digest) => digest,
        Err(err) => {
            error!("Failed to hash password: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response();
        }
    };

    let token = match generate_secret_token() {
        Ok(token) => token,
        Err(err) => {
            error!("Failed to generate verification token: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response();
        }
    };
    let token_hash = hash_secret_token(&token);

    let config = auth_state.config();
    let outcome = insert_user(
        &pool,
        NewUser {
            email: &email,
            password_hash: &password_hash,
            full_name,
            role,
        },
        &token_hash,
        config.verification_token_ttl_minutes(),
    )
    .await;

    match outcome {
        Ok(RegisterOutcome::Created(user)) => {
            let message = email::verification_message(
                config.frontend_base_url(),
                &user.email,
                &user.full_name,
                &token,
                config.verification_token_ttl_minutes(),
            );
            let _ = email::deliver(auth_state.email_sender(), message);
            (StatusCode::CREATED, Json(user.to_response())).into_response()
        }
        Ok(RegisterOutcome::Conflict) => (
            StatusCode::CONFLICT,
            "Email already registered".to_string(),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to register user: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Registration failed".to_string(),
            )
                .into_response()
        }
    }
}
