//! Login endpoint issuing bearer access tokens.

use axum::{
    extract::Extension,
    http::{header::WWW_AUTHENTICATE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::error;

use super::password::verify_password;
use super::state::AuthState;
use super::storage::find_user_by_email;
use super::token::issue_access_token;
use super::types::{LoginRequest, Role, TokenResponse, UserStatus};
use super::utils::normalize_email;

/// Unknown email and wrong password collapse into one response so callers
/// cannot probe which accounts exist.
fn invalid_credentials() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
    (
        StatusCode::UNAUTHORIZED,
        headers,
        "Incorrect email or password".to_string(),
    )
        .into_response()
}

/// Authenticate with email + password and return an access token.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Incorrect email or password", body = String),
        (status = 403, description = "Account not verified or inactive", body = String)
    ),
    tag = "auth"
)]
pub async fn login(
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let request: LoginRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    let user = match find_user_by_email(&pool, &email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(err) => {
            error!("Failed to lookup user for login: {err}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string())
                .into_response();
        }
    };

    if !verify_password(&request.password, &user.password_hash) {
        return invalid_credentials();
    }

    // Admin accounts skip the verified gate so they can be provisioned directly.
    if !user.verified && user.role != Role::Admin {
        return (
            StatusCode::FORBIDDEN,
            "Account not verified. Please verify your email.".to_string(),
        )
            .into_response();
    }

    // The admin exemption covers the pending status backing the verified gate;
    // a deactivated account blocks login regardless of role.
    let admin_pending =
        user.role == Role::Admin && user.status == UserStatus::PendingVerification;
    if user.status != UserStatus::Active && !admin_pending {
        return (
            StatusCode::FORBIDDEN,
            "Account is inactive. Please contact support.".to_string(),
        )
            .into_response();
    }

    match issue_access_token(
        auth_state.config(),
        &user.id.to_string(),
        &user.email,
        user.role,
    ) {
        Ok(access_token) => (
            StatusCode::OK,
            Json(TokenResponse {
                access_token,
                token_type: "bearer".to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            error!("Failed to issue access token: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, "Login failed".to_string()).into_response()
        }
    }
}
