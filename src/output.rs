//! Writing the ranked address list

use crate::addressbook::AddressBook;
use crate::error::{Error, Result};
use crate::names::normalize_name;
use crate::rank::ClassedAddresses;
use crate::template::Template;
use crate::types::{AddressData, ContactClass};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// Output encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// One rendered template line per address
    Template(Template),
    /// One JSON array of address records
    Json,
}

/// Format name as it appears in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    #[default]
    Template,
    Json,
}

/// Entries in output order: class 2, 1, 0, each by total rank then address
#[must_use]
pub fn ordered_entries(classed: &ClassedAddresses) -> Vec<&AddressData> {
    let mut ordered = Vec::with_capacity(classed.len());
    for (_, addresses) in classed.iter() {
        let mut entries: Vec<&AddressData> = addresses.values().collect();
        entries.sort_by(|a, b| {
            let a_rank = a.ranks.unwrap_or_default().total;
            let b_rank = b.ranks.unwrap_or_default().total;
            a_rank.cmp(&b_rank).then_with(|| a.address.cmp(&b.address))
        });
        ordered.extend(entries);
    }
    ordered
}

/// Address-book entries that matched nothing, as unranked records
#[must_use]
pub fn unmatched_entries(book: &AddressBook) -> Vec<AddressData> {
    book.unmatched()
        .into_iter()
        .map(|(address, name)| AddressData {
            class: ContactClass::Primary,
            name: name.to_string(),
            normalized_name: normalize_name(name),
            ..AddressData::new(address)
        })
        .collect()
}

/// Write every entry, followed by `unmatched`; returns the number written
pub fn write_addresses<W: Write>(
    mut writer: W,
    classed: &ClassedAddresses,
    format: &OutputFormat,
    unmatched: &[AddressData],
) -> io::Result<usize> {
    let entries: Vec<&AddressData> = ordered_entries(classed)
        .into_iter()
        .chain(unmatched.iter())
        .collect();

    match format {
        OutputFormat::Template(template) => {
            for entry in &entries {
                writer.write_all(template.render(entry).as_bytes())?;
            }
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, &entries)?;
            writer.write_all(b"\n")?;
        }
    }

    writer.flush()?;
    Ok(entries.len())
}

/// Write the output file, creating its directory when needed
pub fn save_addresses(
    path: &Path,
    classed: &ClassedAddresses,
    format: &OutputFormat,
    unmatched: &[AddressData],
) -> Result<usize> {
    let to_error = |source| Error::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(to_error)?;
    }

    let file = File::create(path).map_err(to_error)?;
    let count = write_addresses(BufWriter::new(file), classed, format, unmatched).map_err(to_error)?;
    debug!("{count} addresses written to {}", path.display());
    Ok(count)
}
