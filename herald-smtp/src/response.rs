//! SMTP response parsing and representation.

use crate::error::{MailerError, Result};

/// A complete SMTP response, which may span multiple lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// The SMTP status code.
    pub code: u16,
    /// All message lines in the response.
    pub lines: Vec<String>,
}

impl Response {
    #[must_use]
    pub const fn new(code: u16, lines: Vec<String>) -> Self {
        Self { code, lines }
    }

    /// The message text with lines joined by a single space.
    #[must_use]
    pub fn message(&self) -> String {
        self.lines.join(" ")
    }

    /// Whether this response indicates success (2xx code).
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.code >= 200 && self.code < 300
    }

    /// Whether this response indicates any error (4xx or 5xx code).
    #[must_use]
    pub const fn is_error(&self) -> bool {
        self.code >= 400 && self.code < 600
    }

    /// Parse one response line into `(code, is_last, text)`.
    ///
    /// A space after the status code marks the final line of the
    /// response; a dash marks a continuation line.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError::Parse`] if the line does not match the SMTP
    /// reply format.
    pub fn parse_line(line: &str) -> Result<(u16, bool, String)> {
        if line.len() < 3 {
            return Err(MailerError::Parse(format!(
                "Response line too short: '{line}'"
            )));
        }

        let code = line[..3]
            .parse::<u16>()
            .map_err(|_| MailerError::Parse(format!("Invalid status code: '{}'", &line[..3])))?;

        let is_last = match line.as_bytes().get(3) {
            Some(b' ') | None => true,
            Some(b'-') => false,
            Some(c) => {
                return Err(MailerError::Parse(format!(
                    "Invalid separator character: '{}'",
                    char::from(*c)
                )));
            }
        };

        let text = if line.len() > 4 {
            line[4..].to_string()
        } else {
            String::new()
        };

        Ok((code, is_last, text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_line() {
        let (code, is_last, text) = Response::parse_line("250 OK").unwrap();
        assert_eq!(code, 250);
        assert!(is_last);
        assert_eq!(text, "OK");
    }

    #[test]
    fn parses_continuation_line() {
        let (code, is_last, text) = Response::parse_line("250-SIZE 35882577").unwrap();
        assert_eq!(code, 250);
        assert!(!is_last);
        assert_eq!(text, "SIZE 35882577");
    }

    #[test]
    fn parses_bare_code() {
        let (code, is_last, text) = Response::parse_line("354").unwrap();
        assert_eq!(code, 354);
        assert!(is_last);
        assert_eq!(text, "");
    }

    #[test]
    fn rejects_short_line() {
        assert!(Response::parse_line("25").is_err());
    }

    #[test]
    fn rejects_non_numeric_code() {
        assert!(Response::parse_line("abc hello").is_err());
    }

    #[test]
    fn rejects_bad_separator() {
        assert!(Response::parse_line("250?nope").is_err());
    }

    #[test]
    fn classifies_codes() {
        assert!(Response::new(250, vec![]).is_success());
        assert!(!Response::new(354, vec![]).is_success());
        assert!(!Response::new(354, vec![]).is_error());
        assert!(Response::new(421, vec![]).is_error());
        assert!(Response::new(550, vec![]).is_error());
    }

    #[test]
    fn message_joins_lines() {
        let response = Response::new(
            250,
            vec!["mail.example.com".to_string(), "SIZE 1000".to_string()],
        );
        assert_eq!(response.message(), "mail.example.com SIZE 1000");
    }
}
