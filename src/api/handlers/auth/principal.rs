//! Guard chain resolving bearer tokens into authorized principals.
//!
//! Every protected endpoint declares a [`RoleRequirement`]; the chain itself
//! always runs in the same order: resolve identity, verified gate, active
//! gate, role gate. Each step fails fast with its own rejection.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use sqlx::PgPool;
use tracing::{debug, error};
use uuid::Uuid;

use super::state::AuthState;
use super::storage::{find_user_by_id, UserRecord};
use super::token::decode_token;
use super::types::{Role, UserStatus};
use super::utils::extract_bearer_token;

/// Role requirement a protected endpoint declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoleRequirement {
    Student,
    TeacherOrAdmin,
    Admin,
    AnyActive,
}

impl RoleRequirement {
    fn describe(self) -> &'static str {
        match self {
            Self::Student => "Student",
            Self::TeacherOrAdmin => "Teacher or Admin",
            Self::Admin => "Admin",
            Self::AnyActive => "Authenticated",
        }
    }

    fn allows(self, role: Role) -> bool {
        match self {
            Self::Student => role == Role::Student,
            Self::TeacherOrAdmin => matches!(role, Role::Teacher | Role::Admin),
            Self::Admin => role == Role::Admin,
            Self::AnyActive => true,
        }
    }
}

/// Classified rejection from the guard chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum AuthRejection {
    /// Missing, invalid, or expired token, or no matching account. The
    /// response is one generic 401 either way.
    Unauthorized,
    Unverified,
    Inactive,
    InsufficientRole(RoleRequirement),
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthorized => {
                let mut headers = HeaderMap::new();
                headers.insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
                (
                    StatusCode::UNAUTHORIZED,
                    headers,
                    "Could not validate credentials".to_string(),
                )
                    .into_response()
            }
            Self::Unverified => (
                StatusCode::FORBIDDEN,
                "Account not verified. Please verify your email.".to_string(),
            )
                .into_response(),
            // The inactive gate answers 400, as the original service did.
            Self::Inactive => {
                (StatusCode::BAD_REQUEST, "Inactive user".to_string()).into_response()
            }
            Self::InsufficientRole(requirement) => (
                StatusCode::FORBIDDEN,
                format!(
                    "Not enough permissions. {} access required.",
                    requirement.describe()
                ),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Authorization failed".to_string(),
            )
                .into_response(),
        }
    }
}

/// Resolve the bearer token and walk the guard chain.
pub(super) async fn require_role(
    headers: &HeaderMap,
    pool: &PgPool,
    state: &AuthState,
    requirement: RoleRequirement,
) -> Result<UserRecord, AuthRejection> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(AuthRejection::Unauthorized);
    };

    // Logs keep the rejection reason; the response does not.
    let claims = decode_token(state.config(), &token).map_err(|err| {
        debug!("Rejected bearer token: {err}");
        AuthRejection::Unauthorized
    })?;

    let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthRejection::Unauthorized)?;

    let user = match find_user_by_id(pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Err(AuthRejection::Unauthorized),
        Err(err) => {
            error!("Failed to resolve principal: {err}");
            return Err(AuthRejection::Internal);
        }
    };

    if !user.verified && user.role != Role::Admin {
        return Err(AuthRejection::Unverified);
    }

    if user.status != UserStatus::Active {
        return Err(AuthRejection::Inactive);
    }

    if !requirement.allows(user.role) {
        return Err(AuthRejection::InsufficientRole(requirement));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::email::LogEmailSender;
    use crate::api::handlers::auth::state::AuthConfig;
    use anyhow::Result;
    use axum::http::header::AUTHORIZATION;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use std::sync::Arc;

    fn auth_state() -> AuthState {
        let config = AuthConfig::new(
            "http://localhost:3000".to_string(),
            SecretString::from("test-secret".to_string()),
        );
        AuthState::new(config, Arc::new(LogEmailSender))
    }

    fn lazy_pool() -> Result<PgPool> {
        Ok(PgPoolOptions::new().connect_lazy("postgres://postgres@localhost/postgres")?)
    }

    #[test]
    fn student_requirement_allows_students_only() {
        assert!(RoleRequirement::Student.allows(Role::Student));
        assert!(!RoleRequirement::Student.allows(Role::Teacher));
        assert!(!RoleRequirement::Student.allows(Role::Admin));
    }

    #[test]
    fn teacher_requirement_allows_teachers_and_admins() {
        assert!(!RoleRequirement::TeacherOrAdmin.allows(Role::Student));
        assert!(RoleRequirement::TeacherOrAdmin.allows(Role::Teacher));
        assert!(RoleRequirement::TeacherOrAdmin.allows(Role::Admin));
    }

    #[test]
    fn admin_requirement_allows_admins_only() {
        assert!(!RoleRequirement::Admin.allows(Role::Student));
        assert!(!RoleRequirement::Admin.allows(Role::Teacher));
        assert!(RoleRequirement::Admin.allows(Role::Admin));
    }

    #[test]
    fn any_active_requirement_allows_every_role() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            assert!(RoleRequirement::AnyActive.allows(role));
        }
    }

    #[test]
    fn rejections_map_to_documented_status_codes() {
        assert_eq!(
            AuthRejection::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthRejection::Unverified.into_response().status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthRejection::Inactive.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthRejection::InsufficientRole(RoleRequirement::Admin)
                .into_response()
                .status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AuthRejection::Internal.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn unauthorized_response_carries_www_authenticate() {
        let response = AuthRejection::Unauthorized.into_response();
        assert_eq!(
            response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|value| value.to_str().ok()),
            Some("Bearer")
        );
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() -> Result<()> {
        let pool = lazy_pool()?;
        let result = require_role(
            &HeaderMap::new(),
            &pool,
            &auth_state(),
            RoleRequirement::AnyActive,
        )
        .await;
        assert!(matches!(result, Err(AuthRejection::Unauthorized)));
        Ok(())
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() -> Result<()> {
        let pool = lazy_pool()?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, "Bearer not.a.token".parse()?);
        let result = require_role(&headers, &pool, &auth_state(), RoleRequirement::Student).await;
        assert!(matches!(result, Err(AuthRejection::Unauthorized)));
        Ok(())
    }

    #[tokio::test]
    async fn non_uuid_subject_is_unauthorized() -> Result<()> {
        use crate::api::handlers::auth::token::issue_access_token;

        let state = auth_state();
        let token = issue_access_token(state.config(), "not-a-uuid", "a@example.com", Role::Admin)?;
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {token}").parse()?);

        let pool = lazy_pool()?;
        let result = require_role(&headers, &pool, &state, RoleRequirement::Admin).await;
        assert!(matches!(result, Err(AuthRejection::Unauthorized)));
        Ok(())
    }
}
