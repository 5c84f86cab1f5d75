//! Outbound email via SMTP.
//!
//! [`Mailer`] wraps the `lettre` async SMTP transport. Configuration is
//! loaded from environment variables; if `SMTP_HOST` is not set,
//! [`MailConfig::from_env`] returns `None` and the services run with mail
//! delivery disabled.

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for mail delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// MailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "Cabinet Juridix <noreply@juridix.local>";

/// Configuration for the SMTP mailer.
#[derive(Debug, Clone)]
pub struct MailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" mailbox.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that mail
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                                |
    /// |-----------------|----------|----------------------------------------|
    /// | `SMTP_HOST`     | yes      | --                                     |
    /// | `SMTP_PORT`     | no       | `587`                                  |
    /// | `SMTP_FROM`     | no       | `Cabinet Juridix <noreply@juridix.local>` |
    /// | `SMTP_USER`     | no       | --                                     |
    /// | `SMTP_PASSWORD` | no       | --                                     |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// Mailer
// ---------------------------------------------------------------------------

/// Sends HTML emails via SMTP.
#[derive(Clone)]
pub struct Mailer {
    config: MailConfig,
}

impl Mailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Send an HTML email to the specified address.
    pub async fn send(&self, to_email: &str, subject: &str, html_body: &str) -> Result<(), MailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(to_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string())
            .map_err(|e| MailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(to = to_email, subject, "Email sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Message builders
// ---------------------------------------------------------------------------

/// Build the subject and HTML body for a password-reset email.
///
/// `reset_url` should already embed the token as a query parameter.
pub fn password_reset_email(first_name: &str, reset_url: &str) -> (String, String) {
    let subject = "Réinitialisation de votre mot de passe".to_string();
    let body = format!(
        "<p>Bonjour {first_name},</p>\
         <p>Une réinitialisation de mot de passe a été demandée pour votre compte. \
         Ce lien expire dans 15 minutes et ne peut être utilisé qu'une seule fois.</p>\
         <p><a href=\"{reset_url}\">Réinitialiser mon mot de passe</a></p>\
         <p>Si vous n'êtes pas à l'origine de cette demande, ignorez ce message.</p>"
    );
    (subject, body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(MailConfig::from_env().is_none());
    }

    #[test]
    fn test_mail_error_display_build() {
        let err = MailError::Build("missing body".to_string());
        assert_eq!(err.to_string(), "Email build error: missing body");
    }

    #[test]
    fn test_password_reset_email_embeds_link() {
        let (subject, body) =
            password_reset_email("Jean", "https://app.example.com/reset?token=abc");
        assert!(subject.contains("mot de passe"));
        assert!(body.contains("Bonjour Jean"));
        assert!(body.contains("https://app.example.com/reset?token=abc"));
    }
}
