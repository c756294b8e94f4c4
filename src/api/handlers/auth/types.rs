//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Roles a user can hold on the platform.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "student" => Some(Self::Student),
            "teacher" => Some(Self::Teacher),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }
}

/// Lifecycle state of an account.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    PendingVerification,
}

impl UserStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
            Self::PendingVerification => "pending_verification",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            "pending_verification" => Some(Self::PendingVerification),
            _ => None,
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    /// Defaults to `student` when omitted.
    pub role: Option<Role>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

#[derive(Deserialize, IntoParams, Debug)]
pub struct VerifyEmailParams {
    pub token: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ResendVerificationRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

/// Public account view. Never carries the password hash or any token.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub status: UserStatus,
    pub verified: bool,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn role_serializes_lowercase() -> Result<()> {
        assert_eq!(serde_json::to_value(Role::Student)?, "student");
        assert_eq!(serde_json::to_value(Role::Teacher)?, "teacher");
        assert_eq!(serde_json::to_value(Role::Admin)?, "admin");
        Ok(())
    }

    #[test]
    fn role_parse_round_trips() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn status_serializes_snake_case() -> Result<()> {
        assert_eq!(
            serde_json::to_value(UserStatus::PendingVerification)?,
            "pending_verification"
        );
        assert_eq!(serde_json::to_value(UserStatus::Active)?, "active");
        Ok(())
    }

    #[test]
    fn status_parse_round_trips() {
        for status in [
            UserStatus::Active,
            UserStatus::Inactive,
            UserStatus::PendingVerification,
        ] {
            assert_eq!(UserStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(UserStatus::parse("banned"), None);
    }

    #[test]
    fn register_request_defaults_role_to_none() -> Result<()> {
        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "alice@example.com",
            "password": "password123",
            "full_name": "Alice Smith",
        }))?;
        assert!(request.role.is_none());

        let request: RegisterRequest = serde_json::from_value(serde_json::json!({
            "email": "alice@example.com",
            "password": "password123",
            "full_name": "Alice Smith",
            "role": "teacher",
        }))?;
        assert_eq!(request.role, Some(Role::Teacher));
        Ok(())
    }

    #[test]
    fn user_response_round_trips() -> Result<()> {
        let response = UserResponse {
            id: "4f9a0ee7-52f4-4f36-891f-7a4b7f0c6ad6".to_string(),
            email: "bob@example.com".to_string(),
            full_name: "Bob".to_string(),
            role: Role::Student,
            status: UserStatus::PendingVerification,
            verified: false,
        };
        let value = serde_json::to_value(&response)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "bob@example.com");
        assert!(value.get("password_hash").is_none());
        let decoded: UserResponse = serde_json::from_value(value)?;
        assert_eq!(decoded.role, Role::Student);
        Ok(())
    }
}
