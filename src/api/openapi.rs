//! OpenAPI document for the HTTP surface.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use super::handlers::{auth, health};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::register::register,
        auth::verification::verify_email,
        auth::verification::resend_verification_email,
        auth::login::login,
        auth::reset::request_password_reset,
        auth::reset::confirm_password_reset,
        auth::protected::protected_student,
        auth::protected::protected_teacher,
        auth::protected::protected_admin,
        auth::protected::protected_any_active,
    ),
    components(schemas(
        health::Health,
        auth::types::RegisterRequest,
        auth::types::LoginRequest,
        auth::types::TokenResponse,
        auth::types::ResendVerificationRequest,
        auth::types::PasswordResetRequest,
        auth::types::PasswordResetConfirmRequest,
        auth::types::UserResponse,
        auth::types::MessageResponse,
        auth::types::Role,
        auth::types::UserStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login, verification, and password reset"),
        (name = "protected", description = "Role-gated endpoints"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
