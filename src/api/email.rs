//! Outbound email abstractions and delivery.
//!
//! Auth flows build an [`EmailMessage`] and hand it to [`deliver`], which runs
//! the configured [`EmailSender`] on a blocking task decoupled from the
//! request/response cycle: the HTTP response never waits on delivery, and a
//! failed send is logged, not surfaced to the caller.
//!
//! The default sender for local dev is [`LogEmailSender`], which logs the
//! recipient and subject and returns `Ok(())`. Raw tokens ride in message
//! bodies, so bodies are never logged.

use anyhow::{Context, Result};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tracing::{debug, error, info};

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to_email: String,
    pub subject: String,
    pub body: String,
    pub is_html: bool,
}

/// Email delivery abstraction used by the auth flows.
pub trait EmailSender: Send + Sync {
    /// Deliver a message or return an error for the dispatcher to log.
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Local dev sender that logs instead of sending real email.
#[derive(Clone, Debug)]
pub struct LogEmailSender;

impl EmailSender for LogEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to_email = %message.to_email,
            subject = %message.subject,
            "email send stub"
        );
        Ok(())
    }
}

/// SMTP connection settings for the real sender.
#[derive(Debug)]
pub struct EmailConfig {
    smtp_host: String,
    smtp_port: u16,
    smtp_username: String,
    smtp_password: SecretString,
    from_name: String,
    from_address: String,
}

impl EmailConfig {
    #[must_use]
    pub fn new(
        smtp_host: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: SecretString,
        from_name: String,
        from_address: String,
    ) -> Self {
        Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_name,
            from_address,
        }
    }
}

/// Sender that relays through an SMTP server with STARTTLS.
pub struct SmtpEmailSender {
    transport: SmtpTransport,
    from: Mailbox,
}

impl SmtpEmailSender {
    /// Build the SMTP transport from configuration.
    ///
    /// # Errors
    /// Returns an error if the relay or sender address is invalid.
    pub fn new(config: &EmailConfig) -> Result<Self> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );
        let transport = SmtpTransport::starttls_relay(&config.smtp_host)
            .context("failed to configure SMTP relay")?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();
        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .context("invalid sender address")?;
        Ok(Self { transport, from })
    }
}

impl EmailSender for SmtpEmailSender {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        let content_type = if message.is_html {
            ContentType::TEXT_HTML
        } else {
            ContentType::TEXT_PLAIN
        };
        let email = Message::builder()
            .from(self.from.clone())
            .to(message
                .to_email
                .parse()
                .context("invalid recipient address")?)
            .subject(message.subject.clone())
            .header(content_type)
            .body(message.body.clone())
            .context("failed to build email message")?;

        self.transport
            .send(&email)
            .context("failed to send email over SMTP")?;
        Ok(())
    }
}

/// Dispatch a message in the background.
///
/// The returned handle is only used by tests; production callers drop it.
pub(crate) fn deliver(
    sender: Arc<dyn EmailSender>,
    message: EmailMessage,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let recipient = message.to_email.clone();
        match tokio::task::spawn_blocking(move || sender.send(&message)).await {
            Ok(Ok(())) => debug!("delivered email to {recipient}"),
            Ok(Err(err)) => error!("failed to deliver email to {recipient}: {err}"),
            Err(err) => error!("email delivery task failed: {err}"),
        }
    })
}

/// Build the verification email carrying the raw token link.
pub(crate) fn verification_message(
    frontend_base_url: &str,
    to_email: &str,
    full_name: &str,
    token: &str,
    ttl_minutes: i64,
) -> EmailMessage {
    let base = frontend_base_url.trim_end_matches('/');
    let verify_url = format!("{base}/auth/verify-email?token={token}");
    let body = format!(
        r#"<html>
<body>
    <p>Hello {full_name},</p>
    <p>Thank you for registering with EduAuth!</p>
    <p>To activate your account, please verify your email address:</p>
    <p><a href="{verify_url}">Verify my email</a></p>
    <p>If the link doesn't work, you can use this token: <strong>{token}</strong></p>
    <p>This link will expire in {ttl_minutes} minutes.</p>
    <p>If you did not register for an account, please ignore this email.</p>
</body>
</html>"#
    );
    EmailMessage {
        to_email: to_email.to_string(),
        subject: "Verify your EduAuth account".to_string(),
        body,
        is_html: true,
    }
}

/// Build the password reset email carrying the raw token link.
pub(crate) fn password_reset_message(
    frontend_base_url: &str,
    to_email: &str,
    full_name: &str,
    token: &str,
    ttl_minutes: i64,
) -> EmailMessage {
    let base = frontend_base_url.trim_end_matches('/');
    let reset_url = format!("{base}/auth/reset-password?token={token}");
    let body = format!(
        r#"<html>
<body>
    <p>Hello {full_name},</p>
    <p>You have requested to reset your EduAuth password.</p>
    <p><a href="{reset_url}">Reset my password</a></p>
    <p>If the link doesn't work, you can use this token: <strong>{token}</strong></p>
    <p>This link will expire in {ttl_minutes} minutes.</p>
    <p>If you did not request a password reset, please ignore this email.</p>
</body>
</html>"#
    );
    EmailMessage {
        to_email: to_email.to_string(),
        subject: "EduAuth password reset request".to_string(),
        body,
        is_html: true,
    }
}
