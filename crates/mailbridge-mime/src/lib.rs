//! # mailbridge-mime
//!
//! Outbound email message model for the mailbridge transport.
//!
//! This crate provides the message abstraction the transport consumes:
//! ordered address lists, ordered headers with case-insensitive lookup,
//! content types, and a message body with optional child parts
//! (alternative bodies or file attachments).
//!
//! Unlike mail libraries that hide the constructor-declared content type
//! once a second body part is added, [`Message`] keeps the declared type
//! readable through [`Message::declared_content_type`] alongside the
//! effective (possibly multipart) type.
//!
//! ## Quick Start
//!
//! ```
//! use mailbridge_mime::{ContentType, Message, Part};
//!
//! let mut message = Message::new("Welcome", "<p>Hello</p>", ContentType::text_html());
//! message.set_from("jane@example.com", Some("Jane"));
//! message.add_to("bob@example.com", Some("Bob"));
//! message.add_part(Part::alternative(ContentType::text_plain(), "Hello"));
//!
//! assert!(message.content_type().is_multipart());
//! assert_eq!(message.declared_content_type().essence(), "text/html");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod address;
mod content_type;
mod error;
mod header;
mod message;

pub use address::AddressList;
pub use content_type::ContentType;
pub use error::{Error, Result};
pub use header::Headers;
pub use message::{Message, Part};
