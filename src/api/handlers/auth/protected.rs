//! Demo endpoints exercising each guard chain variant.
//!
//! Each returns the caller's own public view on success, which makes them
//! handy smoke tests for client integrations.

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sqlx::PgPool;
use std::sync::Arc;

use super::principal::{require_role, RoleRequirement};
use super::state::AuthState;
use super::types::UserResponse;

async fn protected(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
    requirement: RoleRequirement,
) -> Response {
    match require_role(&headers, &pool, &auth_state, requirement).await {
        Ok(user) => (StatusCode::OK, Json(user.to_response())).into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

/// Accessible to students only.
#[utoipa::path(
    get,
    path = "/auth/protected/student",
    responses(
        (status = 200, description = "Caller's own account", body = UserResponse),
        (status = 401, description = "Invalid bearer token", body = String),
        (status = 403, description = "Unverified or wrong role", body = String)
    ),
    tag = "protected",
    security(("bearer" = []))
)]
pub async fn protected_student(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    protected(headers, pool, auth_state, RoleRequirement::Student).await
}

/// Accessible to teachers and admins.
#[utoipa::path(
    get,
    path = "/auth/protected/teacher",
    responses(
        (status = 200, description = "Caller's own account", body = UserResponse),
        (status = 401, description = "Invalid bearer token", body = String),
        (status = 403, description = "Unverified or wrong role", body = String)
    ),
    tag = "protected",
    security(("bearer" = []))
)]
pub async fn protected_teacher(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    protected(headers, pool, auth_state, RoleRequirement::TeacherOrAdmin).await
}

/// Accessible to admins only.
#[utoipa::path(
    get,
    path = "/auth/protected/admin",
    responses(
        (status = 200, description = "Caller's own account", body = UserResponse),
        (status = 401, description = "Invalid bearer token", body = String),
        (status = 403, description = "Unverified or wrong role", body = String)
    ),
    tag = "protected",
    security(("bearer" = []))
)]
pub async fn protected_admin(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    protected(headers, pool, auth_state, RoleRequirement::Admin).await
}

/// Accessible to any verified, active account.
#[utoipa::path(
    get,
    path = "/auth/protected/any-active",
    responses(
        (status = 200, description = "Caller's own account", body = UserResponse),
        (status = 401, description = "Invalid bearer token", body = String),
        (status = 403, description = "Unverified account", body = String)
    ),
    tag = "protected",
    security(("bearer" = []))
)]
pub async fn protected_any_active(
    headers: HeaderMap,
    pool: Extension<PgPool>,
    auth_state: Extension<Arc<AuthState>>,
) -> Response {
    protected(headers, pool, auth_state, RoleRequirement::AnyActive).await
}
