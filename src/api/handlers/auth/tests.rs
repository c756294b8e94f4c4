//! Handler-level tests for the input validation paths that run before any
//! database work. Flows that need a live store are covered by the
//! integration suite.

use anyhow::Result;
use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

use crate::api::email::LogEmailSender;

use super::login::login;
use super::register::register;
use super::reset::{confirm_password_reset, request_password_reset};
use super::state::{AuthConfig, AuthState};
use super::types::{PasswordResetConfirmRequest, RegisterRequest, VerifyEmailParams};
use super::verification::{resend_verification_email, verify_email};

fn auth_state() -> Arc<AuthState> {
    let config = AuthConfig::new(
        "http://localhost:3000".to_string(),
        SecretString::from("test-secret".to_string()),
    );
    Arc::new(AuthState::new(config, Arc::new(LogEmailSender)))
}

fn lazy_pool() -> Result<PgPool> {
    Ok(PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?)
}

#[tokio::test]
async fn register_missing_payload() -> Result<()> {
    let response = register(Extension(lazy_pool()?), Extension(auth_state()), None)
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_invalid_email() -> Result<()> {
    let response = register(
        Extension(lazy_pool()?),
        Extension(auth_state()),
        Some(Json(RegisterRequest {
            email: "not-an-email".to_string(),
            password: "password123".to_string(),
            full_name: "Alice".to_string(),
            role: None,
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_short_password() -> Result<()> {
    let response = register(
        Extension(lazy_pool()?),
        Extension(auth_state()),
        Some(Json(RegisterRequest {
            email: "alice@example.com".to_string(),
            password: "short".to_string(),
            full_name: "Alice".to_string(),
            role: None,
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_blank_full_name() -> Result<()> {
    let response = register(
        Extension(lazy_pool()?),
        Extension(auth_state()),
        Some(Json(RegisterRequest {
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
            full_name: "   ".to_string(),
            role: None,
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn login_missing_payload() -> Result<()> {
    let response = login(Extension(lazy_pool()?), Extension(auth_state()), None)
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn verify_email_missing_params() -> Result<()> {
    let response = verify_email(Extension(lazy_pool()?), None)
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn verify_email_blank_token() -> Result<()> {
    let response = verify_email(
        Extension(lazy_pool()?),
        Some(Query(VerifyEmailParams {
            token: "  ".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn resend_verification_missing_payload() -> Result<()> {
    let response = resend_verification_email(Extension(lazy_pool()?), Extension(auth_state()), None)
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn reset_request_missing_payload() -> Result<()> {
    let response = request_password_reset(Extension(lazy_pool()?), Extension(auth_state()), None)
        .await
        .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn reset_confirm_short_password() -> Result<()> {
    let response = confirm_password_reset(
        Extension(lazy_pool()?),
        Some(Json(PasswordResetConfirmRequest {
            token: "some-token".to_string(),
            new_password: "short".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn reset_confirm_blank_token() -> Result<()> {
    let response = confirm_password_reset(
        Extension(lazy_pool()?),
        Some(Json(PasswordResetConfirmRequest {
            token: "  ".to_string(),
            new_password: "password123".to_string(),
        })),
    )
    .await
    .into_response();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
