//! Transport configuration.

use std::path::PathBuf;

/// Configuration consulted by the translator and the transport.
///
/// Passed in explicitly at construction; the transport never reads
/// ambient/global state.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Sending domain, resolved into the API URL.
    pub domain: String,
    /// When true, every send takes the dry-run path: a synthetic
    /// accepted result is produced without calling the provider.
    pub disable_sending: bool,
    /// When true, write a human-readable audit record of every send to
    /// `log_folder`.
    pub enable_logging: bool,
    /// Folder for audit records and persisted attachments.
    pub log_folder: PathBuf,
    /// When true and the message has an HTML body, derive the plain-text
    /// body from it.
    pub provide_plain: bool,
    /// When true, inline CSS into the HTML body (unless a message header
    /// suppresses it for that message).
    pub inline_styles: bool,
    /// When true, audit-log write failures abort the send instead of
    /// being swallowed.
    pub dev_mode: bool,
    /// Default send options merged under every request. Legacy key names
    /// (`inline`, `tracking_opens`, `tracking_clicks`, `testmode`) are
    /// remapped to their `o:*` provider names at merge time.
    pub default_params: Vec<(String, String)>,
}

impl TransportConfig {
    /// Creates a configuration for a sending domain with everything else
    /// at its defaults.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            disable_sending: false,
            enable_logging: false,
            log_folder: PathBuf::from("logs/emails"),
            provide_plain: false,
            inline_styles: false,
            dev_mode: false,
            default_params: Vec::new(),
        }
    }
}
