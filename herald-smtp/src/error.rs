//! Error types for outbound transmission.

use std::io;

use thiserror::Error;

/// Errors that can occur while building or transmitting a message.
#[derive(Error, Debug)]
pub enum MailerError {
    /// IO error occurred during network operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse an SMTP response from the server.
    #[error("Failed to parse SMTP response: {0}")]
    Parse(String),

    /// The server returned an error status code (4xx or 5xx).
    #[error("SMTP error: {code} - {message}")]
    Smtp { code: u16, message: String },

    /// TLS/SSL error occurred.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Invalid message construction.
    #[error("Invalid message: {0}")]
    Build(String),

    /// Connection was closed unexpectedly.
    #[error("Connection closed unexpectedly")]
    ConnectionClosed,
}

/// Specialized `Result` type for mailer operations.
pub type Result<T> = std::result::Result<T, MailerError>;
