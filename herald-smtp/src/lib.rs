//! Outbound mail transmission for herald.
//!
//! This crate provides the [`Mailer`] capability consumed by the dispatch
//! core: a MIME message builder, SMTP response parsing, and an
//! implicit-TLS SMTP client that authenticates with the tenant's
//! credentials and submits one message per call.

mod client;
mod error;
mod mailer;
mod message;
mod response;

pub use client::SmtpClient;
pub use error::{MailerError, Result};
pub use mailer::{Envelope, Mailer, SmtpsMailer};
pub use message::{InlineImage, MessageBuilder, base64_encode, base64_encode_wrapped};
pub use response::Response;
