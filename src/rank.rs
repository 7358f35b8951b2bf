//! Frequency and recency ranking within each class

use crate::addressbook::AddressBook;
use crate::names::{ListNaming, normalize_name, resolve_name};
use crate::types::{AddressData, AddressMap, ContactClass, Ranks};
use std::cmp::Ordering;

/// Address maps partitioned by class
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassedAddresses {
    classes: [AddressMap; 3],
}

impl ClassedAddresses {
    /// Split a map by each address's final class
    #[must_use]
    pub fn partition(addresses: AddressMap) -> Self {
        let mut classed = Self::default();
        for (address, data) in addresses {
            classed.classes[data.class.index()].insert(address, data);
        }
        classed
    }

    #[must_use]
    pub fn class(&self, class: ContactClass) -> &AddressMap {
        &self.classes[class.index()]
    }

    pub fn class_mut(&mut self, class: ContactClass) -> &mut AddressMap {
        &mut self.classes[class.index()]
    }

    /// Look an address up in whichever class holds it
    #[must_use]
    pub fn get(&self, address: &str) -> Option<&AddressData> {
        self.classes.iter().find_map(|map| map.get(address))
    }

    /// Classes in output order: 2, 1, 0
    pub fn iter(&self) -> impl Iterator<Item = (ContactClass, &AddressMap)> {
        ContactClass::DESCENDING
            .into_iter()
            .map(|class| (class, self.class(class)))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.iter().map(AddressMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.iter().all(AddressMap::is_empty)
    }
}

/// Resolve names, partition by class and rank every class
pub fn calculate_ranks(
    addresses: AddressMap,
    book: &mut AddressBook,
    list_naming: &ListNaming,
) -> ClassedAddresses {
    let mut named = AddressMap::with_capacity(addresses.len());
    for (address, mut data) in addresses {
        data.name = resolve_name(&data, book, list_naming);
        data.normalized_name = normalize_name(&data.name);
        named.insert(address, data);
    }
    rank(ClassedAddresses::partition(named))
}

/// Rank every class independently
#[must_use]
pub fn rank(mut classed: ClassedAddresses) -> ClassedAddresses {
    for class in ContactClass::DESCENDING {
        rank_class(classed.class_mut(class), class);
    }
    classed
}

/// Assign frequency, recency and total ranks within one class
pub fn rank_class(addresses: &mut AddressMap, class: ContactClass) {
    let slot = class.index();

    let frequency = ordered_keys(addresses, |a, b| {
        b.class_count[slot].cmp(&a.class_count[slot])
    });
    let recency = ordered_keys(addresses, |a, b| b.class_date[slot].cmp(&a.class_date[slot]));

    for (position, address) in frequency.iter().enumerate() {
        if let Some(data) = addresses.get_mut(address) {
            data.ranks.get_or_insert_with(Ranks::default).frequency = position;
        }
    }
    for (position, address) in recency.iter().enumerate() {
        if let Some(data) = addresses.get_mut(address) {
            let ranks = data.ranks.get_or_insert_with(Ranks::default);
            ranks.recency = position;
            ranks.total = ranks.frequency + ranks.recency;
        }
    }
}

/// Keys sorted by `primary`, ties by ascending address
fn ordered_keys<F>(addresses: &AddressMap, primary: F) -> Vec<String>
where
    F: Fn(&AddressData, &AddressData) -> Ordering,
{
    let mut entries: Vec<(&String, &AddressData)> = addresses.iter().collect();
    entries.sort_by(|(a_key, a), (b_key, b)| primary(a, b).then_with(|| a_key.cmp(b_key)));
    entries.into_iter().map(|(key, _)| key.clone()).collect()
}
