//! Router-level tests exercising routing, extractors, and the guard chain
//! up to the first database touch. End-to-end flows need a live Postgres and
//! live in the deployment smoke suite instead.

use anyhow::Result;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::{Extension, Router};
use eduauth::api::email::LogEmailSender;
use eduauth::api::handlers::auth::{AuthConfig, AuthState};
use secrecy::SecretString;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Result<Router> {
    let config = AuthConfig::new(
        "http://localhost:3000".to_string(),
        SecretString::from("test-secret".to_string()),
    );
    let state = Arc::new(AuthState::new(config, Arc::new(LogEmailSender)));
    let pool = PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?;
    Ok(eduauth::api::router()
        .layer(Extension(state))
        .layer(Extension(pool)))
}

#[tokio::test]
async fn root_returns_welcome_message() -> Result<()> {
    let response = app()?
        .oneshot(Request::builder().uri("/").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024 * 1024).await?;
    let value: serde_json::Value = serde_json::from_slice(&body)?;
    assert_eq!(
        value.get("message").and_then(serde_json::Value::as_str),
        Some("Welcome to EduAuth API! Visit /docs for API documentation.")
    );
    Ok(())
}

#[tokio::test]
async fn register_without_body_is_bad_request() -> Result<()> {
    let response = app()?
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn register_rejects_short_password_before_touching_the_store() -> Result<()> {
    let payload = serde_json::json!({
        "email": "alice@example.com",
        "password": "short",
        "full_name": "Alice Smith",
    });
    let response = app()?
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/register")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn verify_email_without_token_is_bad_request() -> Result<()> {
    let response = app()?
        .oneshot(Request::builder().uri("/auth/verify-email").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_bearer_token() -> Result<()> {
    for path in [
        "/auth/protected/student",
        "/auth/protected/teacher",
        "/auth/protected/admin",
        "/auth/protected/any-active",
    ] {
        let response = app()?
            .oneshot(Request::builder().uri(path).body(Body::empty())?)
            .await?;

        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "expected 401 for {path}"
        );
        assert_eq!(
            response
                .headers()
                .get(header::WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer"),
            "expected WWW-Authenticate on {path}"
        );
    }
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_garbage_tokens() -> Result<()> {
    let response = app()?
        .oneshot(
            Request::builder()
                .uri("/auth/protected/any-active")
                .header(header::AUTHORIZATION, "Bearer not.a.token")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let response = app()?
        .oneshot(Request::builder().uri("/auth/unknown").body(Body::empty())?)
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    Ok(())
}
