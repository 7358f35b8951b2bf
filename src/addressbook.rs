//! Display-name overrides from an external address book

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// Normalized address to display name, consumed during name resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressBook {
    entries: HashMap<String, String>,
    malformed: usize,
}

impl AddressBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `address<TAB>name` lines; malformed lines are reported and skipped
    pub fn parse<R: BufRead>(reader: R) -> std::io::Result<Self> {
        let mut book = Self::new();
        for line in reader.lines() {
            let line = line?;
            let mut fields = line.split('\t');
            match (fields.next(), fields.next()) {
                (Some(address), Some(name)) => {
                    book.insert(address, name);
                }
                _ => {
                    warn!("Couldn't parse address book line {line:?}");
                    book.malformed += 1;
                }
            }
        }
        Ok(book)
    }

    /// Run the lookup command and parse what it prints
    pub fn from_command<S: AsRef<str>>(argv: &[S]) -> Result<Self> {
        let Some((program, args)) = argv.split_first() else {
            return Err(Error::AddressBook("empty command".into()));
        };
        let program = program.as_ref();

        let mut child = Command::new(program)
            .args(args.iter().map(AsRef::as_ref))
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| Error::AddressBook(format!("cannot start {program}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::AddressBook(format!("no stdout from {program}")))?;
        let book = Self::parse(BufReader::new(stdout))
            .map_err(|e| Error::AddressBook(format!("reading output of {program}: {e}")))?;

        let status = child
            .wait()
            .map_err(|e| Error::AddressBook(format!("waiting for {program}: {e}")))?;
        if !status.success() {
            return Err(Error::AddressBook(format!("{program} exited with {status}")));
        }

        debug!(
            "Loaded {} address book entries ({} malformed lines)",
            book.len(),
            book.malformed
        );
        Ok(book)
    }

    /// Add an override; the address is lower-cased
    pub fn insert(&mut self, address: &str, name: &str) -> Option<String> {
        self.entries
            .insert(address.trim().to_lowercase(), name.to_string())
    }

    /// Consume the override for `address` so it no longer counts as unmatched
    pub fn take(&mut self, address: &str) -> Option<String> {
        self.entries.remove(address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub const fn malformed_lines(&self) -> usize {
        self.malformed
    }

    /// Entries never consumed, sorted by address
    #[must_use]
    pub fn unmatched(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(address, name)| (address.as_str(), name.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl<A: AsRef<str>, N: AsRef<str>> FromIterator<(A, N)> for AddressBook {
    fn from_iter<I: IntoIterator<Item = (A, N)>>(iter: I) -> Self {
        let mut book = Self::new();
        for (address, name) in iter {
            book.insert(address.as_ref(), name.as_ref());
        }
        book
    }
}
