//! Translation of a generic message into a provider send request.

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::filters::BodyFilters;
use mailbridge_api::{Attachment, SendRequest};
use mailbridge_mime::{Headers, Message, Part};
use serde_json::Value;

/// Header forwarded verbatim into the payload as `h:List-Unsubscribe`.
const LIST_UNSUBSCRIBE: &str = "List-Unsubscribe";

/// What a control header's parsed value feeds into.
#[derive(Debug, Clone, Copy)]
enum ControlField {
    /// Comma-separated tag list.
    Tags,
    /// JSON object of message metadata.
    Metadata,
    /// Per-message switch suppressing configured CSS inlining.
    InlineCss,
    /// JSON array of `{rcpt, vars}` rows (legacy shape, needs reshaping).
    RecipientVarRows,
    /// JSON object keyed by recipient email (already the target shape).
    RecipientVarMap,
}

/// Control headers in priority order: provider-native names come after
/// their legacy equivalents, so the native value overwrites when both
/// are present. Every matched header is parsed and stripped from the
/// message so it can never re-emerge as a plain header.
const CONTROL_HEADERS: &[(&str, ControlField)] = &[
    ("X-MC-Tags", ControlField::Tags),
    ("X-MC-Metadata", ControlField::Metadata),
    ("X-MC-InlineCSS", ControlField::InlineCss),
    ("X-MC-MergeVars", ControlField::RecipientVarRows),
    ("X-Mailgun-Tag", ControlField::Tags),
    ("X-Mailgun-Variables", ControlField::Metadata),
    (
        "X-Mailgun-Recipient-Variables",
        ControlField::RecipientVarMap,
    ),
];

/// Legacy default-option keys remapped to provider-native `o:` names.
/// The legacy spellings never reach the payload.
const OPTION_REMAPS: &[(&str, &str)] = &[
    ("inline", "o:inline"),
    ("tracking_opens", "o:tracking-opens"),
    ("tracking_clicks", "o:tracking-clicks"),
    ("testmode", "o:testmode"),
];

/// Values extracted from control headers during translation.
#[derive(Debug, Default)]
struct ControlHeaders {
    tags: Vec<String>,
    metadata: serde_json::Map<String, Value>,
    inline_css: Option<bool>,
    recipient_vars: serde_json::Map<String, Value>,
}

/// Translates a generic [`Message`] into a [`SendRequest`].
///
/// Pure except for header stripping: translation removes recognized
/// control headers from the message, so a second translation of the
/// same (now mutated) message no longer sees them. No I/O.
#[derive(Clone, Copy)]
pub struct MessageTranslator<'a> {
    config: &'a TransportConfig,
    filters: &'a dyn BodyFilters,
}

impl<'a> MessageTranslator<'a> {
    /// Creates a translator over the given configuration and filters.
    #[must_use]
    pub fn new(config: &'a TransportConfig, filters: &'a dyn BodyFilters) -> Self {
        Self { config, filters }
    }

    /// Builds the provider request for a message.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFrom`] if the message has no From
    /// address, and [`Error::EmptyBody`] if body assembly yields neither
    /// non-empty html nor non-empty text.
    pub fn translate(&self, message: &mut Message) -> Result<SendRequest> {
        // Step 1: decide whether the primary body is text or html.
        let primary_type = resolve_primary_content_type(message);

        // Step 2: the first From entry is authoritative. It doubles as
        // the failed-recipient stand-in on a failed send.
        let (from_email, from_name) = message.from().first().ok_or(Error::MissingFrom)?;
        let from = format_address(from_email, from_name);

        // Step 3: consume and strip control headers.
        let control = extract_control_headers(message.headers_mut());
        tracing::debug!(
            tags = ?control.tags,
            metadata_keys = control.metadata.len(),
            "Control headers extracted"
        );

        // Step 4: recipient lists.
        let to: Vec<String> = message
            .to()
            .iter()
            .map(|(email, name)| format_address(email, name))
            .collect();
        let cc: Vec<String> = message
            .cc()
            .iter()
            .map(|(email, name)| format_address(email, name))
            .collect();
        let bcc: Vec<String> = message
            .bcc()
            .iter()
            .map(|(email, name)| format_address(email, name))
            .collect();
        // Only the last Reply-To survives; the payload has no list form.
        let reply_to = message
            .reply_to()
            .iter()
            .map(|(email, name)| format_address(email, name))
            .last();

        // Step 5: seed the body from the primary part, then let child
        // parts overwrite (last matching child wins).
        let mut html: Option<String> = None;
        let mut text: Option<String> = None;
        if primary_type == "text/plain" {
            text = Some(message.body().to_string());
        } else {
            // text/html, and the fallthrough for anything unsupported.
            html = Some(message.body().to_string());
        }

        let mut attachments: Vec<Attachment> = Vec::new();
        for part in message.parts() {
            match part {
                Part::Attachment { filename, content } => {
                    attachments.push(Attachment {
                        filename: filename.clone(),
                        content: content.clone(),
                    });
                }
                Part::Alternative { content_type, body } => {
                    if content_type.matches("text/html") {
                        html = Some(body.clone());
                    } else if content_type.matches("text/plain") {
                        text = Some(body.clone());
                    }
                }
            }
        }

        // Step 6: derive plain text from html when asked and absent.
        if text.is_none()
            && self.config.provide_plain
            && let Some(h) = &html
        {
            text = Some(self.filters.html_to_text(h));
        }

        // Step 7: CSS inlining. The header is a per-message suppression
        // switch: a truthy value skips the configured inlining, and the
        // header alone never turns inlining on.
        if !control.inline_css.unwrap_or(false) && self.config.inline_styles {
            html = html.map(|h| {
                if h.is_empty() {
                    h
                } else {
                    self.filters.inline_styles(&h)
                }
            });
        }

        if html.as_deref().is_none_or(str::is_empty) && text.as_deref().is_none_or(str::is_empty) {
            return Err(Error::EmptyBody);
        }

        // Step 8: the one custom header forwarded verbatim.
        let mut custom_headers: Vec<(String, String)> = Vec::new();
        if let Some(value) = message.headers().get(LIST_UNSUBSCRIBE) {
            custom_headers.push((LIST_UNSUBSCRIBE.to_string(), value.to_string()));
        }

        // Step 9: defaults first (with legacy keys remapped), then the
        // authoritative fields on top so a default can never shadow them.
        let mut request = SendRequest::new();
        for (key, value) in &self.config.default_params {
            request.set(remap_option_key(key), value.clone());
        }
        request.set("to", to.join(","));
        request.set("from", from);
        request.set("subject", message.subject());
        if let Some(html) = html {
            request.set("html", html);
        }
        if let Some(text) = text {
            request.set("text", text);
        }
        if let Some(reply_to) = reply_to {
            request.set("h:Reply-To", reply_to);
        }

        // Step 10: remaining fields, attached only when non-empty.
        if !cc.is_empty() {
            request.set_list("cc", cc);
        }
        if !bcc.is_empty() {
            request.set_list("bcc", bcc);
        }
        if !control.recipient_vars.is_empty() {
            request.set(
                "recipient-variables",
                Value::Object(control.recipient_vars).to_string(),
            );
        }
        for (name, value) in custom_headers {
            request.set(format!("h:{name}"), value);
        }
        for attachment in attachments {
            request.attach(attachment);
        }

        Ok(request)
    }
}

/// Resolves the content type governing the primary body.
///
/// The effective type goes multipart as soon as child parts exist, so
/// fall back to the type declared at construction when the effective
/// one is not a plain body type.
pub(crate) fn resolve_primary_content_type(message: &Message) -> String {
    let effective = message.content_type();
    if effective.matches("text/plain") || effective.matches("text/html") {
        return effective.essence();
    }
    message.declared_content_type().essence()
}

/// Formats an address as `Name <email>` or the bare email.
fn format_address(email: &str, name: Option<&str>) -> String {
    name.map_or_else(|| email.to_string(), |n| format!("{n} <{email}>"))
}

/// Remaps a legacy default-option key to its provider-native name.
fn remap_option_key(key: &str) -> String {
    OPTION_REMAPS
        .iter()
        .find(|(legacy, _)| *legacy == key)
        .map_or_else(|| key.to_string(), |(_, native)| (*native).to_string())
}

/// Consumes the recognized control headers in priority order.
///
/// Each matched header is stripped. Malformed JSON is logged and
/// ignored, but the header is stripped regardless so it never leaks
/// into the payload.
fn extract_control_headers(headers: &mut Headers) -> ControlHeaders {
    let mut control = ControlHeaders::default();

    for (name, field) in CONTROL_HEADERS {
        let Some(raw) = headers.remove(name) else {
            continue;
        };

        match field {
            ControlField::Tags => {
                control.tags = raw.split(',').map(|t| t.trim().to_string()).collect();
            }
            ControlField::Metadata => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => control.metadata = map,
                Ok(_) | Err(_) => {
                    tracing::warn!(header = name, "Ignoring malformed metadata header");
                }
            },
            ControlField::InlineCss => {
                control.inline_css = Some(parse_flag(&raw));
            }
            ControlField::RecipientVarRows => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Array(rows)) => {
                    let mut vars = serde_json::Map::new();
                    for row in rows {
                        if let Value::Object(row) = row
                            && let Some(Value::String(rcpt)) = row.get("rcpt")
                        {
                            vars.insert(
                                rcpt.clone(),
                                row.get("vars").cloned().unwrap_or(Value::Null),
                            );
                        }
                    }
                    control.recipient_vars = vars;
                }
                Ok(_) | Err(_) => {
                    tracing::warn!(header = name, "Ignoring malformed recipient variables");
                }
            },
            ControlField::RecipientVarMap => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => control.recipient_vars = map,
                Ok(_) | Err(_) => {
                    tracing::warn!(header = name, "Ignoring malformed recipient variables");
                }
            },
        }
    }

    control
}

/// Parses a boolean flag header value.
fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::DefaultFilters;
    use mailbridge_mime::ContentType;

    fn config() -> TransportConfig {
        TransportConfig::new("mg.example.com")
    }

    fn plain_message() -> Message {
        let mut message = Message::new("Greetings", "Hello", ContentType::text_plain());
        message.set_from("jane@x.com", None);
        message.add_to("bob@x.com", Some("Bob"));
        message
    }

    fn translate(config: &TransportConfig, message: &mut Message) -> SendRequest {
        MessageTranslator::new(config, &DefaultFilters)
            .translate(message)
            .unwrap()
    }

    #[test]
    fn test_plain_text_scenario() {
        let config = config();
        let mut message = plain_message();
        let request = translate(&config, &mut message);

        assert_eq!(request.get("to"), Some("Bob <bob@x.com>"));
        assert_eq!(request.get("from"), Some("jane@x.com"));
        assert_eq!(request.get("subject"), Some("Greetings"));
        assert_eq!(request.get("text"), Some("Hello"));
        assert!(!request.contains_key("html"));
    }

    #[test]
    fn test_from_with_display_name() {
        let config = config();
        let mut message = Message::new("Hi", "Hello", ContentType::text_plain());
        message.set_from("jane@x.com", Some("Jane Doe"));
        message.add_to("bob@x.com", None);

        let request = translate(&config, &mut message);
        assert_eq!(request.get("from"), Some("Jane Doe <jane@x.com>"));
        assert_eq!(request.get("to"), Some("bob@x.com"));
    }

    #[test]
    fn test_missing_from_is_an_error() {
        let config = config();
        let mut message = Message::new("Hi", "Hello", ContentType::text_plain());
        let result = MessageTranslator::new(&config, &DefaultFilters).translate(&mut message);
        assert!(matches!(result, Err(Error::MissingFrom)));
    }

    #[test]
    fn test_empty_body_is_an_error() {
        let config = config();
        let mut message = Message::new("Hi", "", ContentType::text_plain());
        message.set_from("jane@x.com", None);
        let result = MessageTranslator::new(&config, &DefaultFilters).translate(&mut message);
        assert!(matches!(result, Err(Error::EmptyBody)));
    }

    #[test]
    fn test_unsupported_type_falls_back_to_declared() {
        let config = config();
        // An alternative part flips the effective type to multipart, so
        // the declared type must decide where the primary body goes.
        let mut message = Message::new("Hi", "<p>Hello</p>", ContentType::text_html());
        message.set_from("jane@x.com", None);
        message.add_part(Part::alternative(ContentType::text_plain(), "Hello"));

        let request = translate(&config, &mut message);
        assert_eq!(request.get("html"), Some("<p>Hello</p>"));
        assert_eq!(request.get("text"), Some("Hello"));
    }

    #[test]
    fn test_unknown_type_treated_as_html() {
        let config = config();
        let mut message = Message::new("Hi", "raw", ContentType::new("application", "x-custom"));
        message.set_from("jane@x.com", None);

        let request = translate(&config, &mut message);
        assert_eq!(request.get("html"), Some("raw"));
    }

    #[test]
    fn test_last_alternative_part_wins() {
        let config = config();
        let mut message = Message::new("Hi", "<p>one</p>", ContentType::text_html());
        message.set_from("jane@x.com", None);
        message.add_part(Part::alternative(ContentType::text_html(), "<p>two</p>"));
        message.add_part(Part::alternative(ContentType::text_html(), "<p>three</p>"));

        let request = translate(&config, &mut message);
        assert_eq!(request.get("html"), Some("<p>three</p>"));
    }

    #[test]
    fn test_reply_to_keeps_last() {
        let config = config();
        let mut message = plain_message();
        message.add_reply_to("first@x.com", None);
        message.add_reply_to("second@x.com", Some("Second"));

        let request = translate(&config, &mut message);
        assert_eq!(request.get("h:Reply-To"), Some("Second <second@x.com>"));
    }

    #[test]
    fn test_cc_bcc_present_iff_non_empty() {
        let config = config();
        let mut message = plain_message();
        let request = translate(&config, &mut message);
        assert!(!request.contains_key("cc"));
        assert!(!request.contains_key("bcc"));

        let mut message = plain_message();
        message.add_cc("carol@x.com", Some("Carol"));
        message.add_bcc("dave@x.com", None);
        let request = translate(&config, &mut message);
        assert_eq!(
            request.get_list("cc"),
            Some(&["Carol <carol@x.com>".to_string()][..])
        );
        assert_eq!(request.get_list("bcc"), Some(&["dave@x.com".to_string()][..]));
    }

    #[test]
    fn test_native_recipient_variables_win_over_legacy() {
        let config = config();
        let mut message = plain_message();
        message.headers_mut().add(
            "X-MC-MergeVars",
            r#"[{"rcpt":"bob@x.com","vars":{"name":"Legacy"}}]"#,
        );
        message.headers_mut().add(
            "X-Mailgun-Recipient-Variables",
            r#"{"bob@x.com":{"name":"Native"}}"#,
        );

        let request = translate(&config, &mut message);
        let vars = request.get("recipient-variables").unwrap();
        assert!(vars.contains("Native"));
        assert!(!vars.contains("Legacy"));
        // Neither header survives as a custom header.
        assert!(request.fields().all(|(k, _)| !k.starts_with("h:X-")));
    }

    #[test]
    fn test_legacy_merge_vars_are_reshaped() {
        let config = config();
        let mut message = plain_message();
        message.headers_mut().add(
            "X-MC-MergeVars",
            r#"[{"rcpt":"a@x.com","vars":{"n":1}},{"rcpt":"b@x.com","vars":{"n":2}}]"#,
        );

        let request = translate(&config, &mut message);
        let vars: Value = serde_json::from_str(request.get("recipient-variables").unwrap()).unwrap();
        assert_eq!(vars["a@x.com"]["n"], 1);
        assert_eq!(vars["b@x.com"]["n"], 2);
    }

    #[test]
    fn test_control_headers_are_stripped_from_message() {
        let config = config();
        let mut message = plain_message();
        message.headers_mut().add("X-MC-Tags", "a,b");
        message.headers_mut().add("X-Mailgun-Tag", "c");
        message.headers_mut().add("X-MC-Metadata", r#"{"k":"v"}"#);
        message.headers_mut().add("X-Mailgun-Variables", r#"{"k":"w"}"#);

        let request = translate(&config, &mut message);
        assert!(message.headers().is_empty());
        assert!(request.fields().all(|(k, _)| !k.starts_with("h:")));
    }

    #[test]
    fn test_second_translation_sees_stripped_headers_gone() {
        let config = config();
        let mut message = plain_message();
        message
            .headers_mut()
            .add("X-Mailgun-Recipient-Variables", r#"{"bob@x.com":{"n":1}}"#);

        let first = translate(&config, &mut message);
        assert!(first.contains_key("recipient-variables"));

        let second = translate(&config, &mut message);
        assert!(!second.contains_key("recipient-variables"));
    }

    #[test]
    fn test_malformed_control_json_is_stripped_and_ignored() {
        let config = config();
        let mut message = plain_message();
        message.headers_mut().add("X-MC-Metadata", "{not json");

        let request = translate(&config, &mut message);
        assert!(!message.headers().has("X-MC-Metadata"));
        assert!(!request.contains_key("recipient-variables"));
    }

    #[test]
    fn test_list_unsubscribe_forwarded_and_kept() {
        let config = config();
        let mut message = plain_message();
        message
            .headers_mut()
            .add("List-Unsubscribe", "<mailto:unsub@x.com>");

        let request = translate(&config, &mut message);
        assert_eq!(request.get("h:List-Unsubscribe"), Some("<mailto:unsub@x.com>"));
        // Forwarded, not stripped.
        assert!(message.headers().has("List-Unsubscribe"));
    }

    #[test]
    fn test_scalar_fields_win_over_same_named_defaults() {
        let mut config = config();
        config.default_params = vec![
            ("from".to_string(), "default@x.com".to_string()),
            ("to".to_string(), "default-to@x.com".to_string()),
            ("o:require-tls".to_string(), "yes".to_string()),
        ];

        let mut message = plain_message();
        let request = translate(&config, &mut message);
        assert_eq!(request.get("from"), Some("jane@x.com"));
        assert_eq!(request.get("to"), Some("Bob <bob@x.com>"));
        assert_eq!(request.get("o:require-tls"), Some("yes"));
    }

    #[test]
    fn test_legacy_option_keys_are_remapped() {
        let mut config = config();
        config.default_params = vec![
            ("inline".to_string(), "yes".to_string()),
            ("tracking_opens".to_string(), "yes".to_string()),
            ("tracking_clicks".to_string(), "no".to_string()),
            ("testmode".to_string(), "yes".to_string()),
        ];

        let mut message = plain_message();
        let request = translate(&config, &mut message);
        for legacy in ["inline", "tracking_opens", "tracking_clicks", "testmode"] {
            assert!(!request.contains_key(legacy), "{legacy} leaked verbatim");
        }
        assert_eq!(request.get("o:inline"), Some("yes"));
        assert_eq!(request.get("o:tracking-opens"), Some("yes"));
        assert_eq!(request.get("o:tracking-clicks"), Some("no"));
        assert_eq!(request.get("o:testmode"), Some("yes"));
    }

    #[test]
    fn test_derive_plain_text_from_html() {
        let mut config = config();
        config.provide_plain = true;

        let mut message = Message::new("Hi", "<p>Hello <b>there</b></p>", ContentType::text_html());
        message.set_from("jane@x.com", None);

        let request = translate(&config, &mut message);
        let text = request.get("text").unwrap();
        assert!(!text.is_empty());
        assert!(text.contains("Hello"));
    }

    #[test]
    fn test_existing_text_is_not_overwritten_by_derivation() {
        let mut config = config();
        config.provide_plain = true;

        let mut message = Message::new("Hi", "<p>Hello</p>", ContentType::text_html());
        message.set_from("jane@x.com", None);
        message.add_part(Part::alternative(ContentType::text_plain(), "authored text"));

        let request = translate(&config, &mut message);
        assert_eq!(request.get("text"), Some("authored text"));
    }

    #[test]
    fn test_inline_css_header_suppresses_configured_inlining() {
        struct MarkingFilters;
        impl BodyFilters for MarkingFilters {
            fn html_to_text(&self, html: &str) -> String {
                html.to_string()
            }
            fn inline_styles(&self, _html: &str) -> String {
                "INLINED".to_string()
            }
        }

        fn html_message() -> Message {
            let mut message = Message::new("Hi", "<p>Hello</p>", ContentType::text_html());
            message.set_from("jane@x.com", None);
            message
        }

        // Config on, no header: inlined.
        let mut config = config();
        config.inline_styles = true;
        let mut message = html_message();
        let request = MessageTranslator::new(&config, &MarkingFilters)
            .translate(&mut message)
            .unwrap();
        assert_eq!(request.get("html"), Some("INLINED"));

        // Config on, truthy header: suppressed.
        let mut message = html_message();
        message.headers_mut().add("X-MC-InlineCSS", "1");
        let request = MessageTranslator::new(&config, &MarkingFilters)
            .translate(&mut message)
            .unwrap();
        assert_eq!(request.get("html"), Some("<p>Hello</p>"));

        // Config on, falsy header: no suppression, inlined.
        let mut message = html_message();
        message.headers_mut().add("X-MC-InlineCSS", "false");
        let request = MessageTranslator::new(&config, &MarkingFilters)
            .translate(&mut message)
            .unwrap();
        assert_eq!(request.get("html"), Some("INLINED"));

        // Config off: the header alone never enables inlining.
        let config = self::config();
        let mut message = html_message();
        message.headers_mut().add("X-MC-InlineCSS", "1");
        let request = MessageTranslator::new(&config, &MarkingFilters)
            .translate(&mut message)
            .unwrap();
        assert_eq!(request.get("html"), Some("<p>Hello</p>"));
    }

    #[test]
    fn test_attachments_present_iff_non_empty() {
        let config = config();
        let mut message = plain_message();
        let request = translate(&config, &mut message);
        assert!(!request.has_attachments());

        let mut message = plain_message();
        message.add_part(Part::attachment("notes.txt", b"notes".to_vec()));
        let request = translate(&config, &mut message);
        assert_eq!(request.attachments().len(), 1);
        assert_eq!(request.attachments()[0].filename, "notes.txt");
        // Attachment parts never steal the primary body.
        assert_eq!(request.get("text"), Some("Hello"));
    }

    #[test]
    fn test_to_entries_are_comma_joined() {
        let config = config();
        let mut message = plain_message();
        message.add_to("carol@x.com", None);

        let request = translate(&config, &mut message);
        assert_eq!(request.get("to"), Some("Bob <bob@x.com>,carol@x.com"));
    }

    #[test]
    fn test_empty_to_is_allowed() {
        let config = config();
        let mut message = Message::new("Hi", "Hello", ContentType::text_plain());
        message.set_from("jane@x.com", None);

        let request = translate(&config, &mut message);
        assert_eq!(request.get("to"), Some(""));
    }
}
