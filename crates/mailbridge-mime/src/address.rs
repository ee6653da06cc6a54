//! Ordered email address lists.

/// Ordered mapping of email address to optional display name.
///
/// Iteration order matches insertion order, which matters for the
/// transport: the first From entry is authoritative, and the last
/// Reply-To entry wins.
#[derive(Debug, Clone, Default)]
pub struct AddressList {
    entries: Vec<(String, Option<String>)>,
}

impl AddressList {
    /// Creates a new empty address list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an address with an optional display name.
    ///
    /// An empty display name is treated as absent.
    pub fn add(&mut self, email: impl Into<String>, name: Option<&str>) {
        let name = name.filter(|n| !n.is_empty()).map(ToString::to_string);
        self.entries.push((email.into(), name));
    }

    /// Returns the first (email, display name) pair.
    #[must_use]
    pub fn first(&self) -> Option<(&str, Option<&str>)> {
        self.entries
            .first()
            .map(|(email, name)| (email.as_str(), name.as_deref()))
    }

    /// Returns an iterator over (email, display name) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(email, name)| (email.as_str(), name.as_deref()))
    }

    /// Returns the number of addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
