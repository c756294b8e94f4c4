//! Command-line argument dispatch.
//!
//! Maps validated CLI arguments onto the server action with its full
//! configuration, turning secrets into [`SecretString`] as early as possible.

use crate::cli::actions::{server::Args, server::SmtpArgs, Action};
use anyhow::{Context, Result};
use secrecy::SecretString;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    crate::cli::commands::validate(matches).map_err(|e| anyhow::anyhow!(e))?;

    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .cloned()
        .context("missing required argument: --dsn")?;
    let jwt_secret = matches
        .get_one::<String>("jwt-secret")
        .cloned()
        .map(SecretString::from)
        .context("missing required argument: --jwt-secret")?;
    let frontend_base_url = matches
        .get_one::<String>("frontend-base-url")
        .cloned()
        .context("missing required argument: --frontend-base-url")?;

    let smtp = matches
        .get_one::<String>("smtp-host")
        .map(|host| -> Result<SmtpArgs> {
            Ok(SmtpArgs {
                host: host.clone(),
                port: matches.get_one::<u16>("smtp-port").copied().unwrap_or(587),
                username: matches
                    .get_one::<String>("smtp-username")
                    .cloned()
                    .context("missing required argument: --smtp-username")?,
                password: matches
                    .get_one::<String>("smtp-password")
                    .cloned()
                    .map(SecretString::from)
                    .context("missing required argument: --smtp-password")?,
            })
        })
        .transpose()?;

    Ok(Action::Server(Args {
        port,
        dsn,
        jwt_secret,
        frontend_base_url,
        access_token_ttl_minutes: matches
            .get_one::<i64>("access-token-ttl-minutes")
            .copied()
            .unwrap_or(30),
        refresh_token_ttl_minutes: matches
            .get_one::<i64>("refresh-token-ttl-minutes")
            .copied()
            .unwrap_or(10080),
        verification_token_ttl_minutes: matches
            .get_one::<i64>("verification-token-ttl-minutes")
            .copied()
            .unwrap_or(1440),
        reset_token_ttl_minutes: matches
            .get_one::<i64>("reset-token-ttl-minutes")
            .copied()
            .unwrap_or(60),
        smtp,
        email_from_name: matches
            .get_one::<String>("email-from-name")
            .cloned()
            .unwrap_or_else(|| "EduAuth Support".to_string()),
        email_from_address: matches
            .get_one::<String>("email-from-address")
            .cloned()
            .unwrap_or_else(|| "no-reply@eduauth.dev".to_string()),
    }))
}
