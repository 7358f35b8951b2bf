//! Error types for scanning and ranking

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a single message (or a whole message file) unusable.
///
/// These never abort a run: workers log them and the aggregator counts them.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The file could not be read
    #[error("Failed to read message file: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes do not form a message in the attempted container format
    #[error("Failed to parse message structure: {0}")]
    Structure(String),

    /// No Date header, so the message cannot be ranked
    #[error("Missing required header: Date")]
    NoDate,

    /// Date header present but unparseable
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    /// Invalid header format
    #[error("Invalid header format for {header}: {details}")]
    InvalidHeader { header: String, details: String },
}

/// Errors that abort a run
#[derive(Error, Debug)]
pub enum Error {
    /// A configured maildir root cannot be walked at all
    #[error("Cannot read maildir root {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The directory walk of a root failed before it could start
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    /// A pipeline thread could not be started
    #[error("Failed to spawn {name} thread: {source}")]
    WorkerSpawn {
        name: String,
        source: std::io::Error,
    },

    /// A pipeline thread panicked
    #[error("{0} thread panicked")]
    WorkerPanicked(&'static str),

    /// The address-book lookup command failed
    #[error("Address book lookup failed: {0}")]
    AddressBook(String),

    /// Writing the ranked output failed
    #[error("Failed to write output to {}: {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors in the configuration surface
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("No maildir configured")]
    NoMaildir,

    #[error("Invalid address book command {command:?}: {details}")]
    AddressBookCommand { command: String, details: String },

    #[error("Invalid {which} template: {source}")]
    Template {
        which: &'static str,
        source: TemplateError,
    },
}

/// Errors raised while parsing a placeholder template
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),

    #[error("unknown placeholder {{{0}}}")]
    UnknownField(String),
}

/// Result type for run-level operations
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for message parsing
pub type ParseResult<T> = std::result::Result<T, ParseError>;
