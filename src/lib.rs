//! # EduAuth (Authentication & RBAC for learning platforms)
//!
//! `eduauth` is a pluggable authentication and authorization service for a
//! learning-management backend. It covers user registration, credential
//! verification, email verification, password reset, and role-based access
//! control, backed by Postgres and signed bearer tokens (JWT).
//!
//! ## Accounts & Roles
//!
//! Every account carries a role (`student`, `teacher`, `admin`) and a status
//! (`active`, `inactive`, `pending_verification`). New registrations start as
//! `pending_verification` and become `active` when the emailed verification
//! token is consumed. Admin accounts are exempt from the verified gate.
//!
//! ## Tokens
//!
//! - **Bearer tokens** are stateless HS256 JWTs carrying `{sub, email, role,
//!   exp}`. The server keeps no revocation list: a token stays valid until it
//!   expires or the client discards it.
//! - **Ephemeral secret tokens** (email verification, password reset) are
//!   32-byte random values sent by email. Only a SHA-256 digest is stored,
//!   next to an absolute expiry, and consumption is a single conditional
//!   update so a token can never be redeemed twice.
//!
//! ## Authorization
//!
//! Protected endpoints run a fixed guard chain: resolve the bearer token to an
//! account, require a verified email (admins excepted), require an active
//! status, then apply the endpoint's role requirement.

pub mod api;
pub mod cli;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
