//! Disk audit records of sent messages.

use crate::transport::SendResult;
use mailbridge_mime::{Message, Part};
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::Path;

/// Longest sanitized subject prefix used in the record filename.
const SUBJECT_PREFIX_LEN: usize = 35;

/// Writes one human-readable record of a send, plus one sibling file
/// per attachment, into `log_folder`.
///
/// The record is named `<timestamp>_<sanitized-subject>.<ext>` where
/// `ext` is `html` for an HTML primary body and `txt` otherwise.
pub(crate) fn log_message(
    log_folder: &Path,
    message: &Message,
    result: &SendResult,
) -> io::Result<()> {
    fs::create_dir_all(log_folder)?;

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let title = sanitize_filename(message.subject(), SUBJECT_PREFIX_LEN);
    let log_name = format!("{timestamp}_{title}");

    let mut content = String::from(message.body());
    content.push_str("<hr><pre>Debug infos:\n\n");
    let _ = writeln!(content, "To : {}", format_addresses(message.to()));
    let _ = writeln!(content, "Subject : {}", message.subject());
    let _ = writeln!(content, "From : {}", format_addresses(message.from()));
    content.push_str("Headers:\n");
    for (name, value) in message.headers().iter() {
        let _ = writeln!(content, "  {name}: {value}");
    }
    if !message.to().is_empty() {
        let _ = writeln!(content, "Recipients : {}", format_addresses(message.to()));
    }
    content.push_str("Results:\n");
    let _ = writeln!(content, "  message: {}", result.message);
    let _ = writeln!(content, "  id: {}", result.id);
    content.push_str("</pre>");

    // Persist attachments as sibling files and link them from the record.
    let mut wrote_rule = false;
    for part in message.parts() {
        if let Part::Attachment {
            filename,
            content: data,
        } = part
        {
            if !wrote_rule {
                content.push_str("<hr />");
                wrote_rule = true;
            }
            let destination = log_folder.join(format!("{log_name}_{filename}"));
            fs::write(&destination, data)?;
            let _ = writeln!(
                content,
                "File : <a href=\"{}\">{filename}</a><br/>",
                destination.display()
            );
        }
    }

    let ext = if crate::translate::resolve_primary_content_type(message) == "text/html" {
        "html"
    } else {
        "txt"
    };
    fs::write(log_folder.join(format!("{log_name}.{ext}")), content)
}

/// Reduces a subject to a filesystem-safe prefix: alphanumerics kept,
/// runs of anything else collapsed to single dashes.
fn sanitize_filename(subject: &str, max_len: usize) -> String {
    let mut out = String::new();
    let mut last_dash = false;
    for c in subject.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out.chars().take(max_len).collect()
}

/// Formats an address list for the debug trailer.
fn format_addresses(list: &mailbridge_mime::AddressList) -> String {
    list.iter()
        .map(|(email, name)| {
            name.map_or_else(|| email.to_string(), |n| format!("{n} <{email}>"))
        })
        .collect::<Vec<_>>()
        .join(", ")
}
