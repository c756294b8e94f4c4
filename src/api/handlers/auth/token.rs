//! Bearer token codec (JWT, HS256).
//!
//! Access and refresh tokens share the same claims shape and secret and only
//! differ in TTL. Decoding collapses every failure into a small taxonomy so
//! the HTTP boundary can answer with one generic 401 while logs keep the
//! distinction.

use anyhow::{Context, Result};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use super::state::AuthConfig;
use super::types::Role;

/// Claims embedded in every bearer token.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TokenClaims {
    pub sub: String,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

/// Decoded claims before the required-field check; optional fields let an
/// absent claim surface as `MissingClaim` instead of a parse error.
#[derive(Deserialize)]
struct RawClaims {
    sub: Option<String>,
    email: Option<String>,
    role: Option<Role>,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Why a bearer token was rejected. Internal only; callers answer 401 either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Expired,
    Invalid,
    MissingClaim,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "token has expired"),
            Self::Invalid => write!(f, "token is malformed or has an invalid signature"),
            Self::MissingClaim => write!(f, "token is missing a required claim"),
        }
    }
}

pub fn issue_access_token(
    config: &AuthConfig,
    sub: &str,
    email: &str,
    role: Role,
) -> Result<String> {
    issue_token(config, sub, email, role, config.access_token_ttl_minutes())
}

pub fn issue_refresh_token(
    config: &AuthConfig,
    sub: &str,
    email: &str,
    role: Role,
) -> Result<String> {
    issue_token(config, sub, email, role, config.refresh_token_ttl_minutes())
}

fn issue_token(
    config: &AuthConfig,
    sub: &str,
    email: &str,
    role: Role,
    ttl_minutes: i64,
) -> Result<String> {
    let iat = unix_now()?;
    let claims = TokenClaims {
        sub: sub.to_string(),
        email: email.to_string(),
        role,
        iat,
        exp: iat + ttl_minutes * 60,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret().expose_secret().as_bytes()),
    )
    .context("failed to sign bearer token")
}

pub fn decode_token(config: &AuthConfig, token: &str) -> Result<TokenClaims, TokenError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<RawClaims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret().expose_secret().as_bytes()),
        &validation,
    )
    .map_err(|err| match err.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::MissingRequiredClaim(_) => TokenError::MissingClaim,
        _ => TokenError::Invalid,
    })?;

    let raw = data.claims;
    match (raw.sub, raw.email, raw.role, raw.exp) {
        (Some(sub), Some(email), Some(role), Some(exp)) => Ok(TokenClaims {
            sub,
            email,
            role,
            iat: raw.iat.unwrap_or(0),
            exp,
        }),
        _ => Err(TokenError::MissingClaim),
    }
}

fn unix_now() -> Result<i64> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?;
    i64::try_from(now.as_secs()).context("unix timestamp overflow")
}
