//! Test support: an in-memory mailer and config builders.

use std::time::Duration;

use async_trait::async_trait;
use herald_common::TenantConfig;
use herald_smtp::{Envelope, Mailer, MailerError};
use parking_lot::Mutex;

/// One message accepted by the [`MockMailer`].
#[derive(Debug, Clone)]
pub struct SentMail {
    pub tenant: String,
    pub envelope: Envelope,
    pub message: String,
}

/// A mailer that records deliveries in memory and fails on demand.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<SentMail>>,
    fail_recipients: Vec<String>,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every send to one of `recipients` fails with a permanent SMTP
    /// error.
    pub fn failing_for(recipients: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_recipients: recipients.iter().map(ToString::to_string).collect(),
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().clone()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(
        &self,
        tenant: &TenantConfig,
        envelope: &Envelope,
        message: &str,
    ) -> Result<(), MailerError> {
        if self.fail_recipients.contains(&envelope.to) {
            return Err(MailerError::Smtp {
                code: 550,
                message: "User unknown".to_string(),
            });
        }

        self.sent.lock().push(SentMail {
            tenant: tenant.name.clone(),
            envelope: envelope.clone(),
            message: message.to_string(),
        });
        Ok(())
    }
}

/// A tenant config pointing at nothing in particular; the mock mailer
/// never opens a connection.
pub fn tenant(name: &str, cid: &str, limit: usize) -> TenantConfig {
    TenantConfig {
        name: name.to_string(),
        server: "mail.invalid".to_string(),
        port: 465,
        user: format!("{}@mail.invalid", name.to_lowercase()),
        pass: "secret".to_string(),
        logo: None,
        cid: cid.to_string(),
        limit,
        window_secs: 3600,
    }
}

/// Poll `condition` every 10ms until it holds or `timeout` elapses.
pub async fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
