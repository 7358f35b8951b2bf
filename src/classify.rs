//! Relationship classification against the owner's own addresses

use crate::types::{ContactClass, HeaderField};
use regex::Regex;

/// Regular expressions identifying the mailbox owner's addresses
#[derive(Debug, Clone, Default)]
pub struct OwnerPatterns {
    patterns: Vec<Regex>,
}

impl OwnerPatterns {
    #[must_use]
    pub const fn new(patterns: Vec<Regex>) -> Self {
        Self { patterns }
    }

    /// Compile owner patterns, failing on the first invalid one
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        patterns
            .iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `address` belongs to the owner
    #[must_use]
    pub fn matches(&self, address: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(address))
    }
}

/// Class of an address found in `field` of a message sent by `sender`
///
/// Without owner patterns there is nothing to discriminate on and every
/// address is [`ContactClass::Primary`].
#[must_use]
pub fn classify(field: HeaderField, sender: &str, owners: &OwnerPatterns) -> ContactClass {
    if owners.is_empty() {
        return ContactClass::Primary;
    }
    if field == HeaderField::From || !owners.matches(sender) {
        return ContactClass::Sender;
    }
    match field {
        HeaderField::To | HeaderField::Bcc => ContactClass::Primary,
        HeaderField::Cc => ContactClass::Secondary,
        HeaderField::From | HeaderField::Sender | HeaderField::ReplyTo => ContactClass::Sender,
    }
}
