// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound mail transport for contact-form submissions.
//!
//! The SMTP transport is hidden behind [`MailTransport`] so the HTTP
//! handlers can be tested without a network.

use async_trait::async_trait;
use folio_core::FolioError;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message as Email, Tokio1Executor};
use tracing::info;

use folio_config::model::RelayConfig;

/// A validated contact-form submission ready to be forwarded.
#[derive(Debug, Clone)]
pub struct OutboundMail {
    pub from_name: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

/// Sends contact-form submissions to the configured inbox.
#[async_trait]
pub trait MailTransport: Send + Sync + 'static {
    async fn send(&self, mail: OutboundMail) -> Result<(), FolioError>;
}

/// Mail transport backed by lettre's async SMTP client.
#[derive(Debug)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    recipient: String,
}

impl SmtpMailer {
    /// Builds a mailer from the `[relay]` config section.
    ///
    /// Fails when the relay is not fully configured (missing SMTP host,
    /// credentials, or recipient).
    pub fn from_config(config: &RelayConfig) -> Result<Self, FolioError> {
        let host = config
            .smtp_host
            .as_deref()
            .ok_or_else(|| FolioError::Config("relay.smtp_host is not set".into()))?;
        let username = config
            .smtp_username
            .as_deref()
            .ok_or_else(|| FolioError::Config("relay.smtp_username is not set".into()))?;
        let password = config
            .smtp_password
            .as_deref()
            .ok_or_else(|| FolioError::Config("relay.smtp_password is not set".into()))?;
        let recipient = config
            .recipient
            .as_deref()
            .ok_or_else(|| FolioError::Config("relay.recipient is not set".into()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| FolioError::Relay {
                message: format!("failed to build SMTP transport for {host}: {e}"),
                source: Some(Box::new(e)),
            })?
            .port(config.smtp_port)
            .credentials(Credentials::new(username.to_string(), password.to_string()))
            .build();

        Ok(Self {
            transport,
            sender: username.to_string(),
            recipient: recipient.to_string(),
        })
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: OutboundMail) -> Result<(), FolioError> {
        let email = Email::builder()
            .from(
                format!("{} <{}>", mail.from_name, self.sender)
                    .parse()
                    .map_err(|e| FolioError::Relay {
                        message: format!("invalid sender address: {e}"),
                        source: None,
                    })?,
            )
            .reply_to(mail.reply_to.parse().map_err(|e| FolioError::Relay {
                message: format!("invalid reply-to address: {e}"),
                source: None,
            })?)
            .to(self.recipient.parse().map_err(|e| FolioError::Relay {
                message: format!("invalid recipient address: {e}"),
                source: None,
            })?)
            .subject(mail.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body)
            .map_err(|e| FolioError::Relay {
                message: format!("failed to build email: {e}"),
                source: Some(Box::new(e)),
            })?;

        self.transport.send(email).await.map_err(|e| FolioError::Relay {
            message: format!("SMTP send failed: {e}"),
            source: Some(Box::new(e)),
        })?;

        info!(recipient = %self.recipient, "contact submission forwarded");
        Ok(())
    }
}
