//! A single queued send request.

use serde::{Deserialize, Serialize};

/// One email to one recipient, owned by a tenant queue from submission
/// until it reaches a terminal outcome. Immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendTask {
    /// Recipient address.
    pub recipient: String,

    /// Subject line, used verbatim on the wire.
    pub subject: String,

    /// Message body; may contain HTML and inline-image placeholders.
    pub body: String,

    /// Whether `body` is HTML (`text/html`) or plain text.
    pub is_html: bool,

    /// Optional `Reply-To` address.
    #[serde(default)]
    pub reply_to: Option<String>,

    /// Name of the brand this task was routed to.
    pub tenant: String,
}

impl SendTask {
    /// A shortened subject for log lines: at most 20 characters, with an
    /// ellipsis when truncated. The full subject is still sent.
    #[must_use]
    pub fn subject_preview(&self) -> String {
        let mut chars = self.subject.chars();
        let preview: String = chars.by_ref().take(20).collect();
        if chars.next().is_some() {
            format!("{preview}...")
        } else {
            preview
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(subject: &str) -> SendTask {
        SendTask {
            recipient: "a@x.com".to_string(),
            subject: subject.to_string(),
            body: String::new(),
            is_html: false,
            reply_to: None,
            tenant: "Acme".to_string(),
        }
    }

    #[test]
    fn short_subject_is_unchanged() {
        assert_eq!(task("Hi there").subject_preview(), "Hi there");
    }

    #[test]
    fn exactly_twenty_chars_is_unchanged() {
        let subject = "a".repeat(20);
        assert_eq!(task(&subject).subject_preview(), subject);
    }

    #[test]
    fn long_subject_is_truncated_with_ellipsis() {
        let preview = task("This subject is far too long for a log line").subject_preview();
        assert_eq!(preview, "This subject is far ...");
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let subject = "héllo wörld with ümläuts and more";
        let preview = task(subject).subject_preview();
        assert!(preview.ends_with("..."));
        assert_eq!(preview.chars().count(), 23);
    }
}
