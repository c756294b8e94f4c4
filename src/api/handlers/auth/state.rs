//! Auth configuration and shared state.

use secrecy::SecretString;
use std::sync::Arc;

use crate::api::email::EmailSender;

const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 30;
const DEFAULT_REFRESH_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;
const DEFAULT_VERIFICATION_TOKEN_TTL_MINUTES: i64 = 24 * 60;
const DEFAULT_RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// Immutable configuration built once at startup and shared by reference.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    frontend_base_url: String,
    jwt_secret: SecretString,
    access_token_ttl_minutes: i64,
    refresh_token_ttl_minutes: i64,
    verification_token_ttl_minutes: i64,
    reset_token_ttl_minutes: i64,
}

impl AuthConfig {
    #[must_use]
    pub fn new(frontend_base_url: String, jwt_secret: SecretString) -> Self {
        Self {
            frontend_base_url,
            jwt_secret,
            access_token_ttl_minutes: DEFAULT_ACCESS_TOKEN_TTL_MINUTES,
            refresh_token_ttl_minutes: DEFAULT_REFRESH_TOKEN_TTL_MINUTES,
            verification_token_ttl_minutes: DEFAULT_VERIFICATION_TOKEN_TTL_MINUTES,
            reset_token_ttl_minutes: DEFAULT_RESET_TOKEN_TTL_MINUTES,
        }
    }

    #[must_use]
    pub fn with_access_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_refresh_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.refresh_token_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_verification_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.verification_token_ttl_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_reset_token_ttl_minutes(mut self, minutes: i64) -> Self {
        self.reset_token_ttl_minutes = minutes;
        self
    }

    pub(crate) fn frontend_base_url(&self) -> &str {
        &self.frontend_base_url
    }

    pub(super) fn jwt_secret(&self) -> &SecretString {
        &self.jwt_secret
    }

    pub(super) fn access_token_ttl_minutes(&self) -> i64 {
        self.access_token_ttl_minutes
    }

    pub(super) fn refresh_token_ttl_minutes(&self) -> i64 {
        self.refresh_token_ttl_minutes
    }

    pub(super) fn verification_token_ttl_minutes(&self) -> i64 {
        self.verification_token_ttl_minutes
    }

    pub(super) fn reset_token_ttl_minutes(&self) -> i64 {
        self.reset_token_ttl_minutes
    }
}

/// Per-process auth state: configuration plus the injected email sender.
pub struct AuthState {
    config: AuthConfig,
    email_sender: Arc<dyn EmailSender>,
}

impl AuthState {
    pub fn new(config: AuthConfig, email_sender: Arc<dyn EmailSender>) -> Self {
        Self {
            config,
            email_sender,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn email_sender(&self) -> Arc<dyn EmailSender> {
        Arc::clone(&self.email_sender)
    }
}
