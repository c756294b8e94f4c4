use axum::response::{IntoResponse, Json};
use serde_json::json;

// axum handler for the landing route
pub async fn root() -> impl IntoResponse {
    Json(json!({
        "message": "Welcome to EduAuth API! Visit /docs for API documentation."
    }))
}
