//! The transmission capability handed to dispatch workers.

use async_trait::async_trait;
use herald_common::TenantConfig;

use crate::{
    client::SmtpClient,
    error::{MailerError, Result},
    response::Response,
};

/// The SMTP envelope for a single message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Envelope sender (MAIL FROM).
    pub from: String,
    /// Envelope recipient (RCPT TO).
    pub to: String,
}

/// A capability that attempts to deliver one fully-formed message.
///
/// Implementations make exactly one attempt; retry policy, if any, is the
/// caller's concern.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Attempt delivery of `message` for `tenant`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, authentication, or any SMTP
    /// step fails.
    async fn send(&self, tenant: &TenantConfig, envelope: &Envelope, message: &str) -> Result<()>;
}

/// Production mailer speaking SMTPS with AUTH LOGIN, one connection per
/// message.
#[derive(Debug, Clone, Copy, Default)]
pub struct SmtpsMailer;

impl SmtpsMailer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn checked(response: Response) -> Result<Response> {
    if response.is_error() {
        Err(MailerError::Smtp {
            code: response.code,
            message: response.message(),
        })
    } else {
        Ok(response)
    }
}

#[async_trait]
impl Mailer for SmtpsMailer {
    async fn send(&self, tenant: &TenantConfig, envelope: &Envelope, message: &str) -> Result<()> {
        let mut client = SmtpClient::connect(&tenant.endpoint(), &tenant.server).await?;

        checked(client.read_greeting().await?)?;

        let helo_domain = tenant
            .user
            .rsplit_once('@')
            .map_or(tenant.server.as_str(), |(_, domain)| domain);
        checked(client.ehlo(helo_domain).await?)?;

        let auth = client.auth_login(&tenant.user, &tenant.pass).await?;
        if auth.code != 235 {
            return Err(MailerError::Smtp {
                code: auth.code,
                message: auth.message(),
            });
        }

        checked(client.mail_from(&envelope.from).await?)?;
        checked(client.rcpt_to(&envelope.to).await?)?;
        checked(client.data().await?)?;
        checked(client.send_data(message).await?)?;

        // Best effort: the message is already accepted at this point.
        if let Err(e) = client.quit().await {
            tracing::debug!(error = %e, "QUIT after successful submission failed");
        }

        Ok(())
    }
}
