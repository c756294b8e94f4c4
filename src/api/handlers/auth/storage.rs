//! Database access for accounts and their single-use tokens.

use anyhow::{Context, Result};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{Role, UserResponse, UserStatus};
use super::utils::is_unique_violation;

/// Account row as the auth flows see it.
#[derive(Debug, Clone)]
pub(crate) struct UserRecord {
    pub(crate) id: Uuid,
    pub(crate) email: String,
    pub(crate) full_name: String,
    pub(crate) password_hash: String,
    pub(crate) role: Role,
    pub(crate) status: UserStatus,
    pub(crate) verified: bool,
}

impl UserRecord {
    pub(crate) fn to_response(&self) -> UserResponse {
        UserResponse {
            id: self.id.to_string(),
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role,
            status: self.status,
            verified: self.verified,
        }
    }
}

/// Outcome when attempting to create a new account.
#[derive(Debug)]
pub(super) enum RegisterOutcome {
    Created(UserRecord),
    Conflict,
}

/// Fields needed to create an account.
pub(super) struct NewUser<'a> {
    pub(super) email: &'a str,
    pub(super) password_hash: &'a str,
    pub(super) full_name: &'a str,
    pub(super) role: Role,
}

fn user_from_row(row: &PgRow) -> Result<UserRecord> {
    let role: String = row.get("role");
    let status: String = row.get("status");
    Ok(UserRecord {
        id: row.get("id"),
        email: row.get("email"),
        full_name: row.get("full_name"),
        password_hash: row.get("password_hash"),
        role: Role::parse(&role).with_context(|| format!("unknown role in database: {role}"))?,
        status: UserStatus::parse(&status)
            .with_context(|| format!("unknown status in database: {status}"))?,
        verified: row.get("verified"),
    })
}

pub(super) async fn find_user_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
    let query = r"
        SELECT id, email, full_name, password_hash, role, status, verified
        FROM users
        WHERE email = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(email)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by email")?;

    row.as_ref().map(user_from_row).transpose()
}

pub(super) async fn find_user_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
    let query = r"
        SELECT id, email, full_name, password_hash, role, status, verified
        FROM users
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by id")?;

    row.as_ref().map(user_from_row).transpose()
}

/// Create the account together with its first verification token, so a
/// registered user always has a pending verification in flight.
pub(super) async fn insert_user(
    pool: &PgPool,
    user: NewUser<'_>,
    verification_token_hash: &[u8],
    verification_ttl_minutes: i64,
) -> Result<RegisterOutcome> {
    let query = r"
        INSERT INTO users
            (id, email, password_hash, full_name, role, status, verified,
             verification_token_hash, verification_token_expires_at)
        VALUES ($1, $2, $3, $4, $5, 'pending_verification', FALSE,
                $6, NOW() + ($7 * INTERVAL '1 minute'))
        RETURNING id, email, full_name, password_hash, role, status, verified
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(Uuid::new_v4())
        .bind(user.email)
        .bind(user.password_hash)
        .bind(user.full_name)
        .bind(user.role.as_str())
        .bind(verification_token_hash)
        .bind(verification_ttl_minutes)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(RegisterOutcome::Created(user_from_row(&row)?)),
        Err(err) if is_unique_violation(&err) => Ok(RegisterOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}

/// Store a fresh verification token, overwriting any outstanding one.
///
/// Returns whether a row was updated; `false` means the account vanished
/// concurrently.
pub(super) async fn store_verification_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &[u8],
    ttl_minutes: i64,
) -> Result<bool> {
    let query = r"
        UPDATE users
        SET verification_token_hash = $2,
            verification_token_expires_at = NOW() + ($3 * INTERVAL '1 minute'),
            updated_at = NOW()
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(user_id)
        .bind(token_hash)
        .bind(ttl_minutes)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to store verification token")?;
    Ok(result.rows_affected() > 0)
}

/// Store a fresh password reset token, overwriting any outstanding one.
pub(super) async fn store_reset_token(
    pool: &PgPool,
    user_id: Uuid,
    token_hash: &[u8],
    ttl_minutes: i64,
) -> Result<bool> {
    let query = r"
        UPDATE users
        SET reset_token_hash = $2,
            reset_token_expires_at = NOW() + ($3 * INTERVAL '1 minute'),
            updated_at = NOW()
        WHERE id = $1
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let result = sqlx::query(query)
        .bind(user_id)
        .bind(token_hash)
        .bind(ttl_minutes)
        .execute(pool)
        .instrument(span)
        .await
        .context("failed to store reset token")?;
    Ok(result.rows_affected() > 0)
}

/// Consume a verification token and activate the account.
///
/// Clearing the token and applying the side effect is a single conditional
/// update keyed on the stored hash and expiry, so two racing requests cannot
/// both redeem the same token.
pub(super) async fn consume_verification_token(
    pool: &PgPool,
    token_hash: &[u8],
) -> Result<Option<UserRecord>> {
    let query = r"
        UPDATE users
        SET verified = TRUE,
            status = 'active',
            verification_token_hash = NULL,
            verification_token_expires_at = NULL,
            updated_at = NOW()
        WHERE verification_token_hash = $1
          AND verification_token_expires_at > NOW()
        RETURNING id, email, full_name, password_hash, role, status, verified
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to consume verification token")?;

    row.as_ref().map(user_from_row).transpose()
}

/// Consume a reset token and install the new password hash, in one
/// conditional update for the same single-use guarantee as verification.
pub(super) async fn consume_reset_token(
    pool: &PgPool,
    token_hash: &[u8],
    new_password_hash: &str,
) -> Result<Option<UserRecord>> {
    let query = r"
        UPDATE users
        SET password_hash = $2,
            reset_token_hash = NULL,
            reset_token_expires_at = NULL,
            updated_at = NOW()
        WHERE reset_token_hash = $1
          AND reset_token_expires_at > NOW()
        RETURNING id, email, full_name, password_hash, role, status, verified
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(token_hash)
        .bind(new_password_hash)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to consume reset token")?;

    row.as_ref().map(user_from_row).transpose()
}
