//! Send coordination: gate, translate, submit, account, notify.

use crate::audit;
use crate::config::TransportConfig;
use crate::error::Result;
use crate::event::{EventDispatcher, SendListener, SendOutcome};
use crate::filters::{BodyFilters, DefaultFilters};
use crate::translate::MessageTranslator;
use mailbridge_api::{ApiClient, SendRequest, SendResponse};
use mailbridge_mime::Message;
use std::sync::atomic::{AtomicU64, Ordering};

/// Header that forces the dry-run path for a single message. Consumed
/// and stripped; never forwarded.
const DISABLE_HEADER: &str = "X-SendingDisabled";

/// Substring of the provider status message that marks acceptance.
const QUEUED_MARKER: &str = "Queued";

/// Normalized outcome of one send call.
#[derive(Debug, Clone)]
pub struct SendResult {
    /// Human-readable status message (`"Disabled"` on the dry-run path).
    pub message: String,
    /// Opaque send id (freshly generated on the dry-run path).
    pub id: String,
    /// Whether the message was accepted for delivery.
    pub queued: bool,
}

/// The provider send endpoint, as consumed by [`Transport`].
///
/// [`ApiClient`] is the production implementation; tests substitute a
/// mock to observe or fail the call.
#[allow(async_fn_in_trait)]
pub trait SendApi {
    /// Submits a request through the given sending domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission fails; the transport
    /// propagates it untouched.
    async fn send(
        &self,
        domain: &str,
        request: &SendRequest,
    ) -> mailbridge_api::Result<SendResponse>;
}

impl SendApi for ApiClient {
    async fn send(
        &self,
        domain: &str,
        request: &SendRequest,
    ) -> mailbridge_api::Result<SendResponse> {
        ApiClient::send(self, domain, request).await
    }
}

/// Coordinates one send: pre-send notification, disable gate,
/// translation, provider call, audit logging, accounting, post-send
/// notification.
///
/// Not reentrant: `send` takes `&mut self`, and the last-result snapshot
/// is overwritten at the start of every call. Callers needing per-call
/// audit must read [`Transport::last_result`] before the next send.
pub struct Transport<C = ApiClient> {
    client: C,
    config: TransportConfig,
    filters: Box<dyn BodyFilters>,
    dispatcher: EventDispatcher,
    last_result: Option<SendResult>,
}

impl<C: SendApi> Transport<C> {
    /// Creates a transport with the default body filters.
    #[must_use]
    pub fn new(client: C, config: TransportConfig) -> Self {
        Self::with_filters(client, config, Box::new(DefaultFilters))
    }

    /// Creates a transport with custom body filters.
    #[must_use]
    pub fn with_filters(
        client: C,
        config: TransportConfig,
        filters: Box<dyn BodyFilters>,
    ) -> Self {
        Self {
            client,
            config,
            filters,
            dispatcher: EventDispatcher::new(),
            last_result: None,
        }
    }

    /// Registers a send observer.
    pub fn register_listener(&mut self, listener: Box<dyn SendListener>) {
        self.dispatcher.register(listener);
    }

    /// The result of the most recent send, until the next send
    /// overwrites it.
    #[must_use]
    pub fn last_result(&self) -> Option<&SendResult> {
        self.last_result.as_ref()
    }

    /// Sends a message and returns the number of accepted recipients:
    /// 1 if the provider queued the message, 0 otherwise (the provider
    /// does not report per-recipient counts).
    ///
    /// On a non-accepted send the From address is pushed into
    /// `failed_recipients` as the only address known to this layer.
    /// A cancellation by a pre-send observer returns 0 without a
    /// provider call or a log entry.
    ///
    /// # Errors
    ///
    /// Returns structural translation errors, provider errors untouched,
    /// and audit-log errors only when `dev_mode` is set.
    pub async fn send(
        &mut self,
        message: &mut Message,
        failed_recipients: &mut Vec<String>,
    ) -> Result<u32> {
        self.last_result = None;

        if self.dispatcher.dispatch_before_send(message) {
            tracing::debug!("Send cancelled by observer");
            return Ok(0);
        }

        let disabled =
            message.headers_mut().remove(DISABLE_HEADER).is_some() || self.config.disable_sending;

        let translator = MessageTranslator::new(&self.config, self.filters.as_ref());
        let request = translator.translate(message)?;
        let from = request.get("from").unwrap_or_default().to_string();

        let result = if disabled {
            tracing::info!(subject = message.subject(), "Sending disabled, dry run");
            SendResult {
                message: "Disabled".to_string(),
                id: unique_id(),
                queued: true,
            }
        } else {
            let response = self.client.send(&self.config.domain, &request).await?;
            let queued = response.message.contains(QUEUED_MARKER);
            tracing::info!(id = %response.id, queued, "Message submitted");
            SendResult {
                message: response.message,
                id: response.id,
                queued,
            }
        };

        if self.config.enable_logging {
            if let Err(e) = audit::log_message(&self.config.log_folder, message, &result) {
                if self.config.dev_mode {
                    return Err(e.into());
                }
                // Audit logging must never block real sends outside dev.
                tracing::warn!(error = %e, "Audit log write failed");
            }
        }

        let accepted = u32::from(result.queued);
        if accepted == 0 {
            failed_recipients.push(from);
        }
        self.last_result = Some(result);

        let outcome = if accepted > 0 {
            SendOutcome::Success
        } else {
            SendOutcome::Failed
        };
        self.dispatcher.dispatch_send_performed(message, outcome);

        Ok(accepted)
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generates a process-unique id for synthetic dry-run results.
fn unique_id() -> String {
    let micros = chrono::Utc::now().timestamp_micros();
    let n = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{micros:x}.{n:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_ids_differ() {
        let a = unique_id();
        let b = unique_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
