//! Combining the address maps of several maildir roots

use crate::types::AddressMap;

/// Merge `incoming` into `base`
///
/// Addresses only in `incoming` are inserted as they are. Shared addresses
/// concatenate their names, add their counters and keep the later date per
/// class; the class is the higher of the two. Counts, dates and classes do
/// not depend on argument order.
#[must_use]
pub fn merge_sources(mut base: AddressMap, incoming: AddressMap) -> AddressMap {
    if base.is_empty() {
        return incoming;
    }
    for (address, data) in incoming {
        match base.get_mut(&address) {
            Some(existing) => existing.absorb(data),
            None => {
                base.insert(address, data);
            }
        }
    }
    base
}
