//! Render a queued task into a transmittable message
//!
//! Tasks may have been composed against any brand's template, so every
//! known content-identifier placeholder in the body is rewritten to the
//! sending tenant's own token before the message is built. The brand logo
//! is attached inline when its file is readable; a missing or unreadable
//! logo downgrades to a warning rather than failing the send.

use herald_common::{SendTask, TenantConfig};
use herald_smtp::{Envelope, InlineImage, MailerError, MessageBuilder};

/// A task rendered into wire form, plus any non-fatal warnings collected
/// along the way.
#[derive(Debug)]
pub struct Rendered {
    pub envelope: Envelope,
    pub message: String,
    pub warnings: Vec<String>,
}

/// Rewrite every known `cid:<token>` placeholder to the tenant's own
/// token.
///
/// With two brands this matches the historical behaviour of rewriting
/// both fixed tokens unconditionally; with more it generalises without
/// special cases.
#[must_use]
pub fn rewrite_placeholders(body: &str, known_cids: &[String], own_cid: &str) -> String {
    let own = format!("cid:{own_cid}");
    let mut body = body.to_string();

    for cid in known_cids {
        if cid != own_cid {
            body = body.replace(&format!("cid:{cid}"), &own);
        }
    }

    body
}

/// Build the full message and envelope for one task.
///
/// # Errors
///
/// Returns an error only when the message itself cannot be assembled;
/// logo problems are reported through [`Rendered::warnings`].
pub async fn render(
    task: &SendTask,
    tenant: &TenantConfig,
    known_cids: &[String],
) -> Result<Rendered, MailerError> {
    let body = rewrite_placeholders(&task.body, known_cids, &tenant.cid);
    let mut warnings = Vec::new();

    let mut builder = MessageBuilder::new()
        .from(tenant.from_header())
        .to(task.recipient.clone())
        .subject(task.subject.clone())
        .body(body, task.is_html);

    if let Some(reply_to) = &task.reply_to {
        builder = builder.reply_to(reply_to.clone());
    }

    if let Some(logo) = &tenant.logo {
        match tokio::fs::read(logo).await {
            Ok(data) => {
                let filename = logo
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("logo")
                    .to_string();
                builder = builder.inline_image(InlineImage::new(filename, tenant.cid.clone(), data));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warnings.push(format!("Logo file missing: {}", logo.display()));
            }
            Err(e) => {
                warnings.push(format!("Logo error: {e}"));
            }
        }
    }

    let message = builder.build()?;

    Ok(Rendered {
        envelope: Envelope {
            from: tenant.user.clone(),
            to: task.recipient.clone(),
        },
        message,
        warnings,
    })
}
