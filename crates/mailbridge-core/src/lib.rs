//! # mailbridge-core
//!
//! Message translation and send coordination for a Mailgun-style
//! transactional-email provider.
//!
//! Two pieces:
//! - [`MessageTranslator`] — pure translation of a generic
//!   [`mailbridge_mime::Message`] into the provider payload
//!   ([`mailbridge_api::SendRequest`]): addressing, body-part
//!   resolution, legacy control-header extraction, default-option
//!   merging.
//! - [`Transport`] — one send per call: cancellable pre-send
//!   notification, disable gate (dry run), provider submission, audit
//!   logging, accepted-recipient accounting, post-send notification.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailbridge_api::ApiClient;
//! use mailbridge_core::{Transport, TransportConfig};
//! use mailbridge_mime::{ContentType, Message};
//!
//! # async fn example() -> mailbridge_core::Result<()> {
//! let config = TransportConfig::new("mg.example.com");
//! let mut transport = Transport::new(ApiClient::new("key-secret"), config);
//!
//! let mut message = Message::new("Hello", "Hi Bob", ContentType::text_plain());
//! message.set_from("jane@example.com", Some("Jane"));
//! message.add_to("bob@example.com", Some("Bob"));
//!
//! let mut failed = Vec::new();
//! let accepted = transport.send(&mut message, &mut failed).await?;
//! assert_eq!(accepted, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod audit;
mod config;
mod error;
mod event;
mod filters;
mod translate;
mod transport;

pub use config::TransportConfig;
pub use error::{Error, Result};
pub use event::{BeforeSendEvent, EventDispatcher, SendListener, SendOutcome};
pub use filters::{BodyFilters, DefaultFilters};
pub use translate::MessageTranslator;
pub use transport::{SendApi, SendResult, Transport};
