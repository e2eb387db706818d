//! SMTP client over implicit TLS.
//!
//! Tenant endpoints speak SMTPS: the TLS handshake happens immediately
//! after the TCP connection, before the first SMTP byte.

use std::sync::Arc;

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, ReadHalf, WriteHalf},
    net::TcpStream,
};
use tokio_rustls::{
    TlsConnector,
    client::TlsStream,
    rustls::{ClientConfig, RootCertStore, pki_types::ServerName},
};

use crate::{
    error::{MailerError, Result},
    message::base64_encode,
    response::Response,
};

/// Maximum accepted length of a single response line.
const MAX_LINE_LENGTH: usize = 8192;

/// An authenticated-capable SMTP client session over TLS.
pub struct SmtpClient {
    reader: BufReader<ReadHalf<TlsStream<TcpStream>>>,
    writer: WriteHalf<TlsStream<TcpStream>>,
}

impl SmtpClient {
    /// Connects to `addr` and completes the TLS handshake with
    /// `server_name` as SNI, verifying against the system trust roots.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or handshake fails.
    pub async fn connect(addr: &str, server_name: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;

        let mut root_store = RootCertStore::empty();
        let certs = rustls_native_certs::load_native_certs();
        for cert in certs.certs {
            root_store
                .add(cert)
                .map_err(|e| MailerError::Tls(format!("Failed to add certificate: {e}")))?;
        }
        if !certs.errors.is_empty() {
            tracing::warn!(?certs.errors, "Some certificates could not be loaded");
        }

        let config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        let connector = TlsConnector::from(Arc::new(config));
        let sni = ServerName::try_from(server_name.to_string())
            .map_err(|e| MailerError::Tls(format!("Invalid server name: {e}")))?;

        let tls_stream = connector
            .connect(sni, stream)
            .await
            .map_err(|e| MailerError::Tls(e.to_string()))?;

        let (read_half, write_half) = tokio::io::split(tls_stream);

        Ok(Self {
            reader: BufReader::new(read_half),
            writer: write_half,
        })
    }

    /// Reads the initial server greeting (220 response).
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or the greeting is invalid.
    pub async fn read_greeting(&mut self) -> Result<Response> {
        self.read_response().await
    }

    /// Sends a command line and reads the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if sending or reading fails.
    pub async fn command(&mut self, command: &str) -> Result<Response> {
        self.writer
            .write_all(format!("{command}\r\n").as_bytes())
            .await?;
        self.read_response().await
    }

    /// Sends EHLO with the specified domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn ehlo(&mut self, domain: &str) -> Result<Response> {
        self.command(&format!("EHLO {domain}")).await
    }

    /// Performs the AUTH LOGIN exchange.
    ///
    /// Returns the final response, which is 235 on successful
    /// authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if the server refuses either challenge step.
    pub async fn auth_login(&mut self, user: &str, pass: &str) -> Result<Response> {
        let response = self.command("AUTH LOGIN").await?;
        if response.code != 334 {
            return Err(MailerError::Smtp {
                code: response.code,
                message: response.message(),
            });
        }

        let response = self.command(&base64_encode(user.as_bytes())).await?;
        if response.code != 334 {
            return Err(MailerError::Smtp {
                code: response.code,
                message: response.message(),
            });
        }

        self.command(&base64_encode(pass.as_bytes())).await
    }

    /// Sends MAIL FROM.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn mail_from(&mut self, from: &str) -> Result<Response> {
        self.command(&format!("MAIL FROM:<{from}>")).await
    }

    /// Sends RCPT TO.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn rcpt_to(&mut self, to: &str) -> Result<Response> {
        self.command(&format!("RCPT TO:<{to}>")).await
    }

    /// Sends DATA; the server answers 354 when ready for content.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn data(&mut self) -> Result<Response> {
        self.command("DATA").await
    }

    /// Sends the message content, dot-stuffed, followed by the
    /// end-of-data marker.
    ///
    /// # Errors
    ///
    /// Returns an error if sending fails.
    pub async fn send_data(&mut self, data: &str) -> Result<Response> {
        let mut stuffed = data.replace("\r\n.", "\r\n..");
        if stuffed.starts_with('.') {
            stuffed.insert(0, '.');
        }

        self.writer.write_all(stuffed.as_bytes()).await?;

        if stuffed.ends_with("\r\n") {
            // Already terminated.
        } else if stuffed.ends_with('\n') {
            self.writer.write_all(b"\r").await?;
        } else {
            self.writer.write_all(b"\r\n").await?;
        }

        self.writer.write_all(b".\r\n").await?;
        self.read_response().await
    }

    /// Sends QUIT.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn quit(&mut self) -> Result<Response> {
        self.command("QUIT").await
    }

    /// Reads a complete, possibly multi-line SMTP response.
    async fn read_response(&mut self) -> Result<Response> {
        let mut lines = Vec::new();
        let mut first_code = None;

        loop {
            let mut line = String::new();
            let n = self.reader.read_line(&mut line).await?;
            if n == 0 {
                return Err(MailerError::ConnectionClosed);
            }
            if line.len() > MAX_LINE_LENGTH {
                return Err(MailerError::Parse("Response line too long".to_string()));
            }

            let (code, is_last, text) = Response::parse_line(line.trim_end_matches(['\r', '\n']))?;

            match first_code {
                None => first_code = Some(code),
                Some(first) if first != code => {
                    return Err(MailerError::Parse(format!(
                        "Inconsistent status codes in response: {first} vs {code}"
                    )));
                }
                Some(_) => {}
            }

            lines.push(text);

            if is_last {
                let code = first_code.unwrap_or(code);
                return Ok(Response::new(code, lines));
            }
        }
    }
}
