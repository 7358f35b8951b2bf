// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

//! Maildir address ranking
//!
//! Scans maildir trees, collects every address found in message headers and
//! ranks them by how often and how recently the mailbox owner wrote to them.
//!
//! # Pipeline
//!
//! - A walker thread enumerates message files below `new`, `cur` and `tmp`
//! - A pool of parser threads extracts headers (single messages or mbox)
//! - One aggregator folds headers into per-address statistics
//! - Results of several roots are merged
//! - Names are resolved and addresses ranked within their class
//!
//! # Example
//!
//! ```rust,no_run
//! use maildir_rank_addr::{
//!     AddressBook, ListNaming, OwnerPatterns, ScanOptions, calculate_ranks, walk_maildirs,
//! };
//!
//! let options = ScanOptions {
//!     owners: OwnerPatterns::compile(&[r".+@myself\.me"]).unwrap(),
//!     ..ScanOptions::default()
//! };
//! let outcome = walk_maildirs(&["/home/me/Mail"], &options).unwrap();
//! let mut book = AddressBook::new();
//! let classed = calculate_ranks(outcome.addresses, &mut book, &ListNaming::Off);
//!
//! for (class, addresses) in classed.iter() {
//!     println!("class {class}: {} addresses", addresses.len());
//! }
//! ```

mod addressbook;
mod aggregate;
mod classify;
pub mod config;
mod error;
mod filter;
mod merge;
mod names;
pub mod output;
mod parser;
mod rank;
mod scan;
mod template;
mod types;

pub use addressbook::AddressBook;
pub use aggregate::{Aggregator, ScanStats};
pub use classify::{OwnerPatterns, classify};
pub use error::{ConfigError, Error, ParseError, ParseResult, Result, TemplateError};
pub use filter::{AUTOMATED_MARKERS, AddressFilter, is_valid_address};
pub use merge::merge_sources;
pub use names::{DISABLE_LIST_NAMING, ListNaming, most_frequent_name, normalize_name, resolve_name};
pub use parser::{
    Container, ExtractedFile, extract_file, extract_mbox, extract_message, parse_date,
    read_header_block,
};
pub use rank::{ClassedAddresses, calculate_ranks, rank, rank_class};
pub use scan::{
    DEFAULT_PATH_QUEUE_CAPACITY, MAILDIR_SUBDIRS, ParserPool, ScanOptions, ScanOutcome,
    WorkerStats, candidate_files, default_worker_count, walk_maildir, walk_maildirs,
};
pub use template::{Field, Template};
pub use types::*;
