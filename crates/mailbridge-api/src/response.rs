//! Send response types.

use serde::Deserialize;

/// Response from the send endpoint.
///
/// The provider reports a human-readable status message (containing
/// `"Queued"` on acceptance) and an opaque send id. It does not report
/// per-recipient outcomes.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResponse {
    /// Human-readable status message.
    #[serde(default)]
    pub message: String,
    /// Opaque send id.
    #[serde(default)]
    pub id: String,
}
