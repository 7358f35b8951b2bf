//! Rejection of invalid and automated addresses

use regex::Regex;

/// Local-part markers of automated senders
pub const AUTOMATED_MARKERS: [&str; 9] = [
    "do-not-reply",
    "donotreply",
    "no-reply",
    "bounce",
    "noreply",
    "no.reply",
    "no_reply",
    "nevalaszolj",
    "nincsvalasz",
];

/// Address filter with the built-in automated markers plus custom patterns
#[derive(Debug, Clone, Default)]
pub struct AddressFilter {
    custom: Vec<Regex>,
}

impl AddressFilter {
    #[must_use]
    pub const fn new(custom: Vec<Regex>) -> Self {
        Self { custom }
    }

    /// Compile custom exclusion patterns, failing on the first invalid one
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Result<Self, regex::Error> {
        patterns
            .iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    /// Whether a normalized address must be left out of the address map
    #[must_use]
    pub fn is_excluded(&self, address: &str) -> bool {
        let Some((local, _)) = split_valid(address) else {
            return true;
        };

        AUTOMATED_MARKERS
            .iter()
            .any(|marker| local.contains(marker))
            || self.custom.iter().any(|pattern| pattern.is_match(address))
    }
}

/// Basic syntactic validation of a bare `local@domain` address
#[must_use]
pub fn is_valid_address(address: &str) -> bool {
    split_valid(address).is_some()
}

fn split_valid(address: &str) -> Option<(&str, &str)> {
    if address.is_empty()
        || address
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, '<' | '>' | ',' | ';'))
    {
        return None;
    }

    let (local, domain) = address.rsplit_once('@')?;
    if local.is_empty()
        || domain.is_empty()
        || local.contains('@')
        || domain.starts_with('.')
        || domain.ends_with('.')
        || domain.contains("..")
    {
        return None;
    }

    // A bare address must parse back to exactly itself
    match mailparse::addrparse(address) {
        Ok(list) => match list.extract_single_info() {
            Some(info) if info.addr == address => Some((local, domain)),
            _ => None,
        },
        Err(_) => None,
    }
}
