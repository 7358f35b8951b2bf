//! Core types for address aggregation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Map from normalized address to its accumulated data
pub type AddressMap = HashMap<String, AddressData>;

/// Strength of the relationship between the mailbox owner and an address
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", try_from = "u8")]
pub enum ContactClass {
    /// Only ever seen as a sender, or not matched against the owner
    #[default]
    Sender = 0,
    /// Carbon-copied on mail the owner sent
    Secondary = 1,
    /// Direct or blind-copied recipient of mail the owner sent
    Primary = 2,
}

impl ContactClass {
    /// All classes in output order (most relevant first)
    pub const DESCENDING: [Self; 3] = [Self::Primary, Self::Secondary, Self::Sender];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Sender),
            1 => Some(Self::Secondary),
            2 => Some(Self::Primary),
            _ => None,
        }
    }
}

impl From<ContactClass> for u8 {
    fn from(class: ContactClass) -> Self {
        class as Self
    }
}

impl TryFrom<u8> for ContactClass {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(usize::from(value)).ok_or_else(|| format!("invalid class {value}"))
    }
}

impl fmt::Display for ContactClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Address-carrying header fields that feed the aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
    To,
    Cc,
    Bcc,
    From,
    Sender,
    ReplyTo,
}

impl HeaderField {
    /// Fields in the order they are folded into the address map
    pub const ALL: [Self; 6] = [
        Self::To,
        Self::Cc,
        Self::Bcc,
        Self::From,
        Self::Sender,
        Self::ReplyTo,
    ];

    /// Lower-case header name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::To => "to",
            Self::Cc => "cc",
            Self::Bcc => "bcc",
            Self::From => "from",
            Self::Sender => "sender",
            Self::ReplyTo => "reply-to",
        }
    }
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of an address-list header, display name already decoded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mailbox {
    pub name: Option<String>,
    pub address: String,
}

impl Mailbox {
    pub fn new(name: Option<String>, address: impl Into<String>) -> Self {
        Self {
            name,
            address: address.into(),
        }
    }
}

/// Mailing list identity taken from a `List-Id` header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIdentity {
    /// Human readable part, e.g. `Rust Users`
    pub name: String,
    /// Identifier, e.g. `users.rust-lang.org`
    pub id: String,
}

impl ListIdentity {
    /// Parse a `List-Id` value of the form `Name <id>`
    ///
    /// A value without angle brackets is taken as a bare id.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        let Some((start, end)) = value
            .rfind('<')
            .and_then(|start| value[start..].find('>').map(|len| (start, start + len)))
        else {
            return Some(Self {
                name: String::new(),
                id: value.to_string(),
            });
        };

        let id = value[start + 1..end].trim();
        if id.is_empty() {
            return None;
        }
        let name = value[..start].trim().trim_matches('"').trim();
        Some(Self {
            name: name.to_string(),
            id: id.to_string(),
        })
    }

    /// Whether `address` is the posting address of this list
    ///
    /// `users@rust-lang.org` belongs to list id `users.rust-lang.org`.
    #[must_use]
    pub fn owns(&self, address: &str) -> bool {
        address
            .split_once('@')
            .is_some_and(|(local, domain)| format!("{local}.{domain}") == self.id)
    }
}

/// Header view of one message: everything aggregation needs, nothing of the body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Message date, Unix epoch seconds
    pub date: i64,
    pub from: Vec<Mailbox>,
    pub to: Vec<Mailbox>,
    pub cc: Vec<Mailbox>,
    pub bcc: Vec<Mailbox>,
    pub sender: Vec<Mailbox>,
    pub reply_to: Vec<Mailbox>,
    /// Parsed `List-Id`, if the message came through a mailing list
    pub list: Option<ListIdentity>,
}

impl MessageHeader {
    #[must_use]
    pub fn field(&self, field: HeaderField) -> &[Mailbox] {
        match field {
            HeaderField::To => &self.to,
            HeaderField::Cc => &self.cc,
            HeaderField::Bcc => &self.bcc,
            HeaderField::From => &self.from,
            HeaderField::Sender => &self.sender,
            HeaderField::ReplyTo => &self.reply_to,
        }
    }

    pub fn field_mut(&mut self, field: HeaderField) -> &mut Vec<Mailbox> {
        match field {
            HeaderField::To => &mut self.to,
            HeaderField::Cc => &mut self.cc,
            HeaderField::Bcc => &mut self.bcc,
            HeaderField::From => &mut self.from,
            HeaderField::Sender => &mut self.sender,
            HeaderField::ReplyTo => &mut self.reply_to,
        }
    }

    /// Normalized address of the first `From` entry, empty if there is none
    #[must_use]
    pub fn sender_address(&self) -> String {
        self.from
            .first()
            .map(|mailbox| mailbox.address.to_lowercase())
            .unwrap_or_default()
    }
}

/// Positions computed by the ranker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranks {
    /// 0-based position by descending message count
    pub frequency: usize,
    /// 0-based position by descending latest date
    pub recency: usize,
    /// `frequency + recency`, lower is more salient
    pub total: usize,
}

/// Everything known about one normalized address
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressData {
    /// Lower-cased address, the map key
    pub address: String,

    /// Display names seen for this address, in discovery order, duplicates kept
    pub names: Vec<String>,

    /// Highest class ever assigned
    pub class: ContactClass,

    /// Messages seen per class
    pub class_count: [u32; 3],

    /// Latest message date per class, 0 when never seen in that class
    pub class_date: [i64; 3],

    /// Display name chosen by the name resolver
    pub name: String,

    /// `name` with diacritical marks removed
    pub normalized_name: String,

    /// Set once ranking has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranks: Option<Ranks>,

    /// Set when the address is the posting address of a mailing list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListIdentity>,
}

impl AddressData {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Fold one occurrence of this address into the statistics
    pub fn observe(&mut self, class: ContactClass, date: i64, name: Option<&str>) {
        let slot = class.index();
        self.class = self.class.max(class);
        self.class_count[slot] = self.class_count[slot].saturating_add(1);
        self.class_date[slot] = self.class_date[slot].max(date);
        if let Some(name) = name {
            self.names.push(name.to_string());
        }
    }

    /// Combine statistics of the same address from another source
    pub fn absorb(&mut self, other: Self) {
        self.names.extend(other.names);
        self.class = self.class.max(other.class);
        for slot in 0..self.class_count.len() {
            self.class_count[slot] = self.class_count[slot].saturating_add(other.class_count[slot]);
            self.class_date[slot] = self.class_date[slot].max(other.class_date[slot]);
        }
        if self.list.is_none() {
            self.list = other.list;
        }
    }

    /// Message count in the address's own class
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.class_count[self.class.index()]
    }

    /// Latest message date in the address's own class
    #[must_use]
    pub const fn last_seen(&self) -> i64 {
        self.class_date[self.class.index()]
    }
}

impl fmt::Display for AddressData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} <{}>", self.name, self.address)
        }
    }
}
