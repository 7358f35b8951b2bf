//! Message header extraction
//!
//! Only the header block of each message is parsed; bodies are skipped.
//! A file is first read as a single RFC 822 message and, failing that, as an
//! mbox archive of concatenated messages.

use crate::error::{ParseError, ParseResult};
use crate::types::{HeaderField, ListIdentity, Mailbox, MessageHeader};
use chrono::DateTime;
use mailparse::{MailAddr, MailHeader, MailHeaderMap};
use mbox_reader::MboxFile;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Container format a message file was read as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Container {
    /// One message per file (maildir)
    Single,
    /// Concatenated messages separated by `From ` lines
    Mbox,
}

/// Result of extracting one file
#[derive(Debug)]
pub struct ExtractedFile {
    pub container: Container,
    /// One entry per message; mbox messages can fail individually
    pub messages: Vec<ParseResult<MessageHeader>>,
}

/// Read a message file and extract the headers of every message in it
///
/// Only the header block is read for a single message. A file that starts
/// with an mbox separator and does not parse as one message is read as an
/// mbox archive; when that fails too, the single-message error is returned.
pub fn extract_file(path: &Path) -> ParseResult<ExtractedFile> {
    let head = read_header_block(BufReader::new(File::open(path)?))?;

    match extract_message(&head) {
        Ok(header) => Ok(ExtractedFile {
            container: Container::Single,
            messages: vec![Ok(header)],
        }),
        Err(primary) if starts_with_mbox_separator(&head) => match extract_mbox(path) {
            Ok(messages) => Ok(ExtractedFile {
                container: Container::Mbox,
                messages,
            }),
            Err(secondary) => {
                debug!("Not an mbox either: {secondary}");
                Err(primary)
            }
        },
        Err(primary) => Err(primary),
    }
}

/// Bytes up to and including the first empty line
pub fn read_header_block<R: BufRead>(mut reader: R) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::new();
    loop {
        let start = head.len();
        if reader.read_until(b'\n', &mut head)? == 0 {
            break;
        }
        let line = &head[start..];
        if line == b"\n" || line == b"\r\n" {
            break;
        }
    }
    Ok(head)
}

/// Parse the header block of a single RFC 822 message
pub fn extract_message(raw: &[u8]) -> ParseResult<MessageHeader> {
    if starts_with_mbox_separator(raw) {
        return Err(ParseError::Structure(
            "starts with an mbox separator line".into(),
        ));
    }

    let (headers, _body_offset) =
        mailparse::parse_headers(raw).map_err(|e| ParseError::Structure(e.to_string()))?;

    let date = extract_date(&headers)?;

    let mut message = MessageHeader {
        date,
        list: headers
            .get_first_value("List-Id")
            .and_then(|value| ListIdentity::parse(&value)),
        ..MessageHeader::default()
    };

    for field in HeaderField::ALL {
        match extract_addresses(&headers, field) {
            Ok(mailboxes) => *message.field_mut(field) = mailboxes,
            // Without a usable sender the message cannot be classified
            Err(e) if field == HeaderField::From => return Err(e),
            Err(e) => debug!("Skipping {field} header: {e}"),
        }
    }

    Ok(message)
}

/// Parse every message of an mbox archive
pub fn extract_mbox(path: &Path) -> ParseResult<Vec<ParseResult<MessageHeader>>> {
    let mbox = MboxFile::from_file(path)?;

    let messages: Vec<_> = mbox
        .iter()
        .map(|entry| match entry.message() {
            Some(raw) => extract_message(raw),
            None => Err(ParseError::Structure(format!(
                "no message at offset {}",
                entry.offset()
            ))),
        })
        .collect();

    if messages.is_empty() {
        return Err(ParseError::Structure("mbox without messages".into()));
    }
    Ok(messages)
}

fn starts_with_mbox_separator(raw: &[u8]) -> bool {
    raw.starts_with(b"From ")
}

fn extract_date(headers: &[MailHeader]) -> ParseResult<i64> {
    let value = headers
        .get_first_value("Date")
        .filter(|value| !value.trim().is_empty())
        .ok_or(ParseError::NoDate)?;

    parse_date(&value).ok_or(ParseError::InvalidDate(value))
}

/// Parse an RFC 2822 date into Unix epoch seconds
///
/// Strict RFC 2822 first, then the lenient parser for the malformed dates
/// real mail clients produce.
#[must_use]
pub fn parse_date(value: &str) -> Option<i64> {
    let value = value.trim();
    DateTime::parse_from_rfc2822(value)
        .map(|date| date.timestamp())
        .ok()
        .or_else(|| mailparse::dateparse(value).ok())
}

/// Collect every mailbox of every instance of `field`
fn extract_addresses(headers: &[MailHeader], field: HeaderField) -> ParseResult<Vec<Mailbox>> {
    let mut mailboxes = Vec::new();

    for header in headers.get_all_headers(field.as_str()) {
        let list = mailparse::addrparse_header(header).map_err(|e| ParseError::InvalidHeader {
            header: field.to_string(),
            details: e.to_string(),
        })?;

        for addr in list.iter() {
            match addr {
                MailAddr::Single(info) => {
                    mailboxes.push(Mailbox::new(info.display_name.clone(), info.addr.clone()));
                }
                MailAddr::Group(group) => {
                    mailboxes.extend(
                        group
                            .addrs
                            .iter()
                            .map(|info| Mailbox::new(info.display_name.clone(), info.addr.clone())),
                    );
                }
            }
        }
    }

    Ok(mailboxes)
}
