//! Email message builder producing RFC 5322 text with optional inline
//! branding images carried as `multipart/related`.

use std::{io::Write, path::Path};

use crate::error::{MailerError, Result};

/// An image embedded in the message body and referenced by Content-ID.
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// The filename to use in the MIME headers.
    pub filename: String,
    /// The MIME content type (e.g. "image/png").
    pub content_type: String,
    /// Content-ID token the body references as `cid:<token>`.
    pub cid: String,
    /// The image data.
    pub data: Vec<u8>,
}

impl InlineImage {
    /// Create an inline image, guessing the content type from the
    /// filename extension.
    #[must_use]
    pub fn new(filename: impl Into<String>, cid: impl Into<String>, data: Vec<u8>) -> Self {
        let filename = filename.into();
        let content_type = guess_content_type(Path::new(&filename));
        Self {
            filename,
            content_type,
            cid: cid.into(),
            data,
        }
    }
}

/// Builder for outbound messages.
///
/// Without an inline image the output is a single-part text or HTML
/// message; with one it becomes `multipart/related` so mail clients
/// render the image in place.
#[derive(Debug, Clone, Default)]
pub struct MessageBuilder {
    from: Option<String>,
    to: Option<String>,
    reply_to: Option<String>,
    subject: Option<String>,
    body: Option<String>,
    html: bool,
    inline: Option<InlineImage>,
}

impl MessageBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the From header (display-name form allowed).
    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the To header.
    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the Reply-To header.
    #[must_use]
    pub fn reply_to(mut self, reply_to: impl Into<String>) -> Self {
        self.reply_to = Some(reply_to.into());
        self
    }

    /// Sets the Subject header.
    #[must_use]
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body content and whether it is HTML.
    #[must_use]
    pub fn body(mut self, content: impl Into<String>, html: bool) -> Self {
        self.body = Some(content.into());
        self.html = html;
        self
    }

    /// Attaches an image rendered inline via its Content-ID.
    #[must_use]
    pub fn inline_image(mut self, image: InlineImage) -> Self {
        self.inline = Some(image);
        self
    }

    /// Builds the final message text.
    ///
    /// # Errors
    ///
    /// Returns an error if the recipient is missing or the message cannot
    /// be assembled.
    pub fn build(self) -> Result<String> {
        if self.to.is_none() {
            return Err(MailerError::Build("Message has no recipient".to_string()));
        }

        if self.inline.is_some() {
            self.build_related()
        } else {
            self.build_simple()
        }
    }

    fn body_content_type(&self) -> &'static str {
        if self.html {
            "text/html; charset=utf-8"
        } else {
            "text/plain; charset=utf-8"
        }
    }

    fn write_common_headers(&self, message: &mut Vec<u8>) -> Result<()> {
        if let Some(from) = &self.from {
            write!(message, "From: {from}\r\n")?;
        }
        if let Some(to) = &self.to {
            write!(message, "To: {to}\r\n")?;
        }
        if let Some(reply_to) = &self.reply_to {
            write!(message, "Reply-To: {reply_to}\r\n")?;
        }
        if let Some(subject) = &self.subject {
            write!(message, "Subject: {subject}\r\n")?;
        }
        write!(message, "MIME-Version: 1.0\r\n")?;
        Ok(())
    }

    /// Builds a single-part message.
    fn build_simple(self) -> Result<String> {
        let mut message = Vec::with_capacity(1024);

        self.write_common_headers(&mut message)?;
        write!(message, "Content-Type: {}\r\n", self.body_content_type())?;
        write!(message, "\r\n")?;

        if let Some(body) = &self.body {
            write!(message, "{body}")?;
        }

        String::from_utf8(message).map_err(|e| MailerError::Build(e.to_string()))
    }

    /// Builds a `multipart/related` message carrying the inline image.
    fn build_related(self) -> Result<String> {
        let boundary = generate_boundary();
        let mut message = Vec::with_capacity(2048);

        self.write_common_headers(&mut message)?;
        write!(
            message,
            "Content-Type: multipart/related; boundary=\"{boundary}\"\r\n"
        )?;
        write!(message, "\r\n")?;

        // Body part
        write!(message, "--{boundary}\r\n")?;
        write!(message, "Content-Type: {}\r\n", self.body_content_type())?;
        write!(message, "\r\n")?;
        if let Some(body) = &self.body {
            write!(message, "{body}")?;
        }
        write!(message, "\r\n")?;

        // Inline image part
        if let Some(image) = &self.inline {
            write!(message, "--{boundary}\r\n")?;
            write!(message, "Content-Type: {}\r\n", image.content_type)?;
            write!(message, "Content-Transfer-Encoding: base64\r\n")?;
            write!(message, "Content-ID: <{}>\r\n", image.cid)?;
            write!(
                message,
                "Content-Disposition: inline; filename=\"{}\"\r\n",
                image.filename
            )?;
            write!(message, "\r\n")?;
            write!(message, "{}", base64_encode_wrapped(&image.data))?;
        }

        write!(message, "--{boundary}--\r\n")?;

        String::from_utf8(message).map_err(|e| MailerError::Build(e.to_string()))
    }
}

/// Generates a unique MIME boundary string.
fn generate_boundary() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();

    format!("----=_Part_{timestamp}")
}

/// Encodes data as standard padded base64 with no line breaks.
#[must_use]
pub fn base64_encode(data: &[u8]) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";
    let mut result = String::with_capacity(data.len().div_ceil(3) * 4);

    for chunk in data.chunks(3) {
        let mut buf = [0u8; 3];
        buf[..chunk.len()].copy_from_slice(chunk);

        let b1 = (buf[0] >> 2) as usize;
        let b2 = (((buf[0] & 0x03) << 4) | (buf[1] >> 4)) as usize;
        let b3 = (((buf[1] & 0x0F) << 2) | (buf[2] >> 6)) as usize;
        let b4 = (buf[2] & 0x3F) as usize;

        result.push(ALPHABET[b1] as char);
        result.push(ALPHABET[b2] as char);
        result.push(if chunk.len() > 1 {
            ALPHABET[b3] as char
        } else {
            '='
        });
        result.push(if chunk.len() > 2 {
            ALPHABET[b4] as char
        } else {
            '='
        });
    }

    result
}

/// Encodes data as base64 wrapped at 76 characters for MIME bodies.
#[must_use]
pub fn base64_encode_wrapped(data: &[u8]) -> String {
    let encoded = base64_encode(data);
    let mut result = String::with_capacity(encoded.len() + encoded.len() / 76 * 2 + 2);

    for chunk in encoded.as_bytes().chunks(76) {
        // Chunks of an ASCII string are valid UTF-8.
        result.push_str(std::str::from_utf8(chunk).unwrap_or_default());
        result.push_str("\r\n");
    }

    result
}

/// Guesses the MIME content type based on file extension.
fn guess_content_type(path: &Path) -> String {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    match extension.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
    .to_string()
}
