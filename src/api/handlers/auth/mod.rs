//! Authentication flows and the RBAC guard chain.
//!
//! ## Credential lifecycle
//!
//! Registration hashes the password (Argon2id), stores the account as
//! `pending_verification`, and emails a single-use verification token.
//! Consuming that token activates the account; password reset follows the
//! same single-use token pattern with a different side effect.
//!
//! ## Sessions
//!
//! Login exchanges credentials for a stateless HS256 bearer token. There is
//! no server-side session store and no revocation list; a token is valid
//! until its `exp` passes.
//!
//! ## Guards
//!
//! Protected endpoints declare a role requirement and run the fixed guard
//! chain in `principal`: identity, verified, active, role.

pub(crate) mod login;
mod password;
pub(crate) mod principal;
pub(crate) mod protected;
pub(crate) mod register;
pub(crate) mod reset;
mod state;
mod storage;
pub mod token;
pub mod types;
mod utils;
pub(crate) mod verification;

pub use state::{AuthConfig, AuthState};

#[cfg(test)]
mod tests;
