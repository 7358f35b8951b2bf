//! Single-writer aggregation of parsed headers into per-address statistics

use crate::classify::{OwnerPatterns, classify};
use crate::error::ParseResult;
use crate::filter::AddressFilter;
use crate::types::{AddressData, AddressMap, HeaderField, MessageHeader};
use serde::Serialize;
use tracing::{debug, trace};

/// Counters reported at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    /// Files handed to the parser pool
    pub files_read: usize,
    /// Files that could not be read as any supported container
    pub files_failed: usize,
    /// Messages folded into the address map
    pub messages_parsed: usize,
    /// Messages inside readable files that were rejected (no date, bad sender)
    pub messages_rejected: usize,
    /// Walks aborted by a filesystem error after they started
    pub walk_errors: usize,
}

impl ScanStats {
    pub const fn absorb(&mut self, other: &Self) {
        self.files_read += other.files_read;
        self.files_failed += other.files_failed;
        self.messages_parsed += other.messages_parsed;
        self.messages_rejected += other.messages_rejected;
        self.walk_errors += other.walk_errors;
    }

    /// Files from which at least the container could be read
    #[must_use]
    pub const fn files_parsed(&self) -> usize {
        self.files_read.saturating_sub(self.files_failed)
    }
}

/// Owner of the in-progress address map
///
/// Parser workers never touch the map; they hand immutable
/// [`MessageHeader`]s to the one aggregator, which applies them in
/// whatever order they arrive.
#[derive(Debug)]
pub struct Aggregator<'a> {
    owners: &'a OwnerPatterns,
    filter: &'a AddressFilter,
    addresses: AddressMap,
    parsed: usize,
    rejected: usize,
}

impl<'a> Aggregator<'a> {
    #[must_use]
    pub fn new(owners: &'a OwnerPatterns, filter: &'a AddressFilter) -> Self {
        Self {
            owners,
            filter,
            addresses: AddressMap::new(),
            parsed: 0,
            rejected: 0,
        }
    }

    /// Count a per-message outcome and fold it in if it parsed
    pub fn ingest(&mut self, outcome: ParseResult<MessageHeader>) {
        match outcome {
            Ok(header) => self.process(&header),
            Err(e) => {
                debug!("Rejected message: {e}");
                self.rejected += 1;
            }
        }
    }

    /// Fold every address of one message into the map
    pub fn process(&mut self, header: &MessageHeader) {
        let sender = header.sender_address();

        for field in HeaderField::ALL {
            let class = classify(field, &sender, self.owners);

            for mailbox in header.field(field) {
                let address = mailbox.address.trim().to_lowercase();
                if self.filter.is_excluded(&address) {
                    trace!("Filtered {address} in {field}");
                    continue;
                }

                let name = mailbox
                    .name
                    .as_deref()
                    .filter(|name| !name.is_empty() && name.to_lowercase() != address);

                let entry = self
                    .addresses
                    .entry(address)
                    .or_insert_with_key(|address| AddressData::new(address.clone()));
                entry.observe(class, header.date, name);

                if entry.list.is_none()
                    && let Some(list) = &header.list
                    && list.owns(&entry.address)
                {
                    entry.list = Some(list.clone());
                }
            }
        }

        self.parsed += 1;
    }

    #[must_use]
    pub const fn messages_parsed(&self) -> usize {
        self.parsed
    }

    #[must_use]
    pub const fn messages_rejected(&self) -> usize {
        self.rejected
    }

    /// Hand over the finished map
    #[must_use]
    pub fn finish(self) -> (AddressMap, usize, usize) {
        (self.addresses, self.parsed, self.rejected)
    }
}
