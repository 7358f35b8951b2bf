//! Display-name resolution

use crate::addressbook::AddressBook;
use crate::template::Template;
use crate::types::AddressData;
use std::collections::HashMap;
use unicode_general_category::{GeneralCategory, get_general_category};
use unicode_normalization::UnicodeNormalization;

/// Configuration value that turns list naming off
pub const DISABLE_LIST_NAMING: &str = "DISABLELIST";

/// How mailing-list addresses are named
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListNaming {
    /// List addresses are named like any other address
    #[default]
    Off,
    /// Render this template against the address data
    Template(Template),
}

impl ListNaming {
    /// Interpret a configured list template
    ///
    /// Absent, empty and `DISABLELIST` all mean [`ListNaming::Off`].
    pub fn from_config(value: Option<&str>) -> Result<Self, crate::error::TemplateError> {
        match value {
            None => Ok(Self::Off),
            Some(value) if value.is_empty() || value == DISABLE_LIST_NAMING => Ok(Self::Off),
            Some(value) => Template::parse(value).map(Self::Template),
        }
    }
}

/// Pick the display name for one address
///
/// An address-book override wins and is consumed. Next comes the list
/// template for list addresses, then the most frequent observed name.
pub fn resolve_name(data: &AddressData, book: &mut AddressBook, list_naming: &ListNaming) -> String {
    if let Some(name) = book.take(&data.address) {
        return name;
    }

    if data.list.is_some()
        && let ListNaming::Template(template) = list_naming
    {
        let rendered = template.render(data);
        if !rendered.trim().is_empty() {
            return rendered;
        }
    }

    most_frequent_name(&data.names)
}

/// Most frequent non-blank name, ties broken by the smallest name
///
/// The winner is trimmed and stripped of double quotes.
#[must_use]
pub fn most_frequent_name(names: &[String]) -> String {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names.iter().filter(|name| !name.trim().is_empty()) {
        *counts.entry(name.as_str()).or_default() += 1;
    }

    counts
        .into_iter()
        .max_by(|(a, a_count), (b, b_count)| a_count.cmp(b_count).then_with(|| b.cmp(a)))
        .map(|(name, _)| name.trim().replace('"', ""))
        .unwrap_or_default()
}

/// Strip diacritical marks: `Jürgen Çelik` becomes `Jurgen Celik`
///
/// Only non-spacing marks go; spacing vowel signs are letters of the name.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.nfd()
        .filter(|c| get_general_category(*c) != GeneralCategory::NonspacingMark)
        .nfc()
        .collect()
}
