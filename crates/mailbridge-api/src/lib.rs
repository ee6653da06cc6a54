//! # mailbridge-api
//!
//! Payload types and HTTP client for the Mailgun messages API.
//!
//! [`SendRequest`] is an ordered field map mirroring the provider's
//! form-encoded payload (`to`, `from`, `h:*` headers, `o:*` options,
//! repeated `cc`/`bcc` fields) plus binary attachments. [`ApiClient`]
//! submits it to `POST /v3/<domain>/messages`, switching to multipart
//! encoding whenever attachments are present.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mailbridge_api::{ApiClient, SendRequest};
//!
//! # async fn example() -> mailbridge_api::Result<()> {
//! let mut request = SendRequest::new();
//! request.set("from", "jane@example.com");
//! request.set("to", "Bob <bob@example.com>");
//! request.set("subject", "Hello");
//! request.set("text", "Hello");
//!
//! let client = ApiClient::new("key-secret");
//! let response = client.send("mg.example.com", &request).await?;
//! println!("accepted: {} ({})", response.message, response.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod client;
mod error;
mod request;
mod response;

pub use client::ApiClient;
pub use error::{Error, Result};
pub use request::{Attachment, FieldValue, SendRequest};
pub use response::SendResponse;
