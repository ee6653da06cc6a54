//! Send request payload.

/// Value of a payload field: a single string or a repeated field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single value, emitted once.
    Single(String),
    /// List value, emitted as a repeated form field (`cc`, `bcc`).
    List(Vec<String>),
}

/// A file attachment (posted as a multipart `attachment` part).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    /// Attachment filename.
    pub filename: String,
    /// Raw file content.
    pub content: Vec<u8>,
}

/// The message payload for the provider's send endpoint.
///
/// Fields keep insertion order, and [`SendRequest::set`] overwrites an
/// existing key in place. That makes merge precedence explicit: insert
/// defaults first, then set the authoritative fields, and the
/// authoritative values win on key collision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendRequest {
    fields: Vec<(String, FieldValue)>,
    attachments: Vec<Attachment>,
}

impl SendRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a single-valued field, overwriting an existing key in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key.into(), FieldValue::Single(value.into()));
    }

    /// Sets a list-valued field, overwriting an existing key in place.
    pub fn set_list(&mut self, key: impl Into<String>, values: Vec<String>) {
        self.insert(key.into(), FieldValue::List(values));
    }

    fn insert(&mut self, key: String, value: FieldValue) {
        if let Some(slot) = self.fields.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.fields.push((key, value));
        }
    }

    /// Checks whether a field is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    /// Gets a single-valued field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.iter().find_map(|(k, v)| match v {
            FieldValue::Single(s) if k == key => Some(s.as_str()),
            _ => None,
        })
    }

    /// Gets a list-valued field.
    #[must_use]
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.fields.iter().find_map(|(k, v)| match v {
            FieldValue::List(l) if k == key => Some(l.as_slice()),
            _ => None,
        })
    }

    /// Returns all fields in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Adds an attachment.
    pub fn attach(&mut self, attachment: Attachment) {
        self.attachments.push(attachment);
    }

    /// Returns the attachments.
    #[must_use]
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Checks whether any attachments are present.
    #[must_use]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }

    /// Flattens the fields into form pairs, expanding list values into
    /// repeated keys.
    #[must_use]
    pub fn to_form_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.fields.len());
        for (key, value) in &self.fields {
            match value {
                FieldValue::Single(s) => pairs.push((key.clone(), s.clone())),
                FieldValue::List(list) => {
                    for item in list {
                        pairs.push((key.clone(), item.clone()));
                    }
                }
            }
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_overwrites_in_place() {
        let mut request = SendRequest::new();
        request.set("o:testmode", "yes");
        request.set("from", "default@example.com");
        request.set("from", "jane@example.com");

        assert_eq!(request.get("from"), Some("jane@example.com"));
        // Position of the overwritten key is preserved.
        let keys: Vec<_> = request.fields().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["o:testmode", "from"]);
    }

    #[test]
    fn test_list_fields_expand_to_repeated_pairs() {
        let mut request = SendRequest::new();
        request.set("to", "a@example.com");
        request.set_list(
            "cc",
            vec!["b@example.com".to_string(), "c@example.com".to_string()],
        );

        let pairs = request.to_form_pairs();
        assert_eq!(
            pairs,
            vec![
                ("to".to_string(), "a@example.com".to_string()),
                ("cc".to_string(), "b@example.com".to_string()),
                ("cc".to_string(), "c@example.com".to_string()),
            ]
        );
    }

    #[test]
    fn test_attachments() {
        let mut request = SendRequest::new();
        assert!(!request.has_attachments());

        request.attach(Attachment {
            filename: "report.pdf".to_string(),
            content: vec![0x25, 0x50, 0x44, 0x46],
        });
        assert!(request.has_attachments());
        assert_eq!(request.attachments()[0].filename, "report.pdf");
    }
}
