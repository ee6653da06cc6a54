//! Outbound message structure.

use crate::address::AddressList;
use crate::content_type::ContentType;
use crate::header::Headers;

/// A child part of a message: an alternative body or a file attachment.
#[derive(Debug, Clone)]
pub enum Part {
    /// An alternative rendering of the body with its own content type.
    Alternative {
        /// Content type of this body.
        content_type: ContentType,
        /// Body text.
        body: String,
    },
    /// A file attachment.
    Attachment {
        /// Attachment filename.
        filename: String,
        /// Raw file content.
        content: Vec<u8>,
    },
}

impl Part {
    /// Creates an alternative body part.
    #[must_use]
    pub fn alternative(content_type: ContentType, body: impl Into<String>) -> Self {
        Self::Alternative {
            content_type,
            body: body.into(),
        }
    }

    /// Creates an attachment part.
    #[must_use]
    pub fn attachment(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self::Attachment {
            filename: filename.into(),
            content,
        }
    }
}

/// An assembled outbound email message.
///
/// The content type declared at construction stays readable through
/// [`Message::declared_content_type`] even after child parts switch the
/// effective type to a multipart one.
#[derive(Debug, Clone)]
pub struct Message {
    from: AddressList,
    to: AddressList,
    cc: AddressList,
    bcc: AddressList,
    reply_to: AddressList,
    subject: String,
    body: String,
    declared_type: ContentType,
    effective_type: ContentType,
    parts: Vec<Part>,
    headers: Headers,
}

impl Message {
    /// Creates a message with a primary body and its declared content type.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        content_type: ContentType,
    ) -> Self {
        Self {
            from: AddressList::new(),
            to: AddressList::new(),
            cc: AddressList::new(),
            bcc: AddressList::new(),
            reply_to: AddressList::new(),
            subject: subject.into(),
            body: body.into(),
            declared_type: content_type.clone(),
            effective_type: content_type,
            parts: Vec::new(),
            headers: Headers::new(),
        }
    }

    /// Sets the From address (a single entry; earlier entries are kept
    /// but only the first is authoritative).
    pub fn set_from(&mut self, email: impl Into<String>, name: Option<&str>) {
        self.from.add(email, name);
    }

    /// Adds a To recipient.
    pub fn add_to(&mut self, email: impl Into<String>, name: Option<&str>) {
        self.to.add(email, name);
    }

    /// Adds a Cc recipient.
    pub fn add_cc(&mut self, email: impl Into<String>, name: Option<&str>) {
        self.cc.add(email, name);
    }

    /// Adds a Bcc recipient.
    pub fn add_bcc(&mut self, email: impl Into<String>, name: Option<&str>) {
        self.bcc.add(email, name);
    }

    /// Adds a Reply-To address.
    pub fn add_reply_to(&mut self, email: impl Into<String>, name: Option<&str>) {
        self.reply_to.add(email, name);
    }

    /// Adds a child part and updates the effective content type: any
    /// attachment makes the message multipart/mixed, alternative bodies
    /// alone make it multipart/alternative.
    pub fn add_part(&mut self, part: Part) {
        match &part {
            Part::Attachment { .. } => {
                self.effective_type = ContentType::multipart_mixed();
            }
            Part::Alternative { .. } => {
                if !self.effective_type.is_multipart() {
                    self.effective_type = ContentType::multipart_alternative();
                }
            }
        }
        self.parts.push(part);
    }

    /// From addresses.
    #[must_use]
    pub fn from(&self) -> &AddressList {
        &self.from
    }

    /// To recipients.
    #[must_use]
    pub fn to(&self) -> &AddressList {
        &self.to
    }

    /// Cc recipients.
    #[must_use]
    pub fn cc(&self) -> &AddressList {
        &self.cc
    }

    /// Bcc recipients.
    #[must_use]
    pub fn bcc(&self) -> &AddressList {
        &self.bcc
    }

    /// Reply-To addresses.
    #[must_use]
    pub fn reply_to(&self) -> &AddressList {
        &self.reply_to
    }

    /// Message subject.
    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Primary body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Effective content type (multipart once parts are added).
    #[must_use]
    pub fn content_type(&self) -> &ContentType {
        &self.effective_type
    }

    /// Content type declared at construction, regardless of later parts.
    #[must_use]
    pub fn declared_content_type(&self) -> &ContentType {
        &self.declared_type
    }

    /// Child parts.
    #[must_use]
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    /// Message headers.
    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Mutable message headers.
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}
