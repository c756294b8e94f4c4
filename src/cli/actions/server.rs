use crate::api::{
    self,
    email::{EmailConfig, EmailSender, LogEmailSender, SmtpEmailSender},
    handlers::auth::AuthConfig,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: String,
    pub jwt_secret: SecretString,
    pub frontend_base_url: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_minutes: i64,
    pub verification_token_ttl_minutes: i64,
    pub reset_token_ttl_minutes: i64,
    pub smtp: Option<SmtpArgs>,
    pub email_from_name: String,
    pub email_from_address: String,
}

#[derive(Debug)]
pub struct SmtpArgs {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
}

/// Execute the server action.
///
/// # Errors
/// Returns an error if the SMTP transport cannot be built or the server fails
/// to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = AuthConfig::new(args.frontend_base_url, args.jwt_secret)
        .with_access_token_ttl_minutes(args.access_token_ttl_minutes)
        .with_refresh_token_ttl_minutes(args.refresh_token_ttl_minutes)
        .with_verification_token_ttl_minutes(args.verification_token_ttl_minutes)
        .with_reset_token_ttl_minutes(args.reset_token_ttl_minutes);

    let sender: Arc<dyn EmailSender> = match args.smtp {
        Some(smtp) => {
            let email_config = EmailConfig::new(
                smtp.host,
                smtp.port,
                smtp.username,
                smtp.password,
                args.email_from_name,
                args.email_from_address,
            );
            Arc::new(
                SmtpEmailSender::new(&email_config)
                    .context("Failed to initialize SMTP transport")?,
            )
        }
        None => {
            info!("SMTP is not configured, outbound email will be logged");
            Arc::new(LogEmailSender)
        }
    };

    api::new(args.port, args.dsn, config, sender).await
}
