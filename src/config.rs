//! Configuration file and command-line overrides

use crate::classify::OwnerPatterns;
use crate::error::ConfigError;
use crate::filter::AddressFilter;
use crate::names::ListNaming;
use crate::output::{FormatKind, OutputFormat};
use crate::scan::{DEFAULT_PATH_QUEUE_CAPACITY, ScanOptions, default_worker_count};
use crate::template::Template;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory name used below the platform config and cache directories
pub const APP_DIR: &str = "maildir-rank-addr";

/// Output template used when none is configured
pub const DEFAULT_TEMPLATE: &str = "{address}\t{name}";

/// Raw configuration, as read from `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Maildir roots to scan
    pub maildir: Vec<String>,
    /// Where the ranked list is written
    pub outputpath: Option<String>,
    /// Output line template
    pub template: Option<String>,
    /// Template for naming mailing-list addresses
    pub list_template: Option<String>,
    /// Command printing `address<TAB>name` lines
    pub addr_book_cmd: Option<String>,
    /// Append address-book entries that matched no scanned address
    pub addr_book_add_unmatched: bool,
    /// Regular expressions matching the owner's own addresses
    pub addresses: Vec<String>,
    /// Regular expressions of addresses to leave out
    pub filters: Vec<String>,
    pub format: FormatKind,
    pub workers: Option<usize>,
}

/// Values given on the command line; set values replace file values
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub maildir: Vec<String>,
    pub outputpath: Option<String>,
    pub template: Option<String>,
    pub list_template: Option<String>,
    pub addr_book_cmd: Option<String>,
    pub addr_book_add_unmatched: bool,
    pub addresses: Vec<String>,
    pub filters: Vec<String>,
    pub format: Option<FormatKind>,
    pub workers: Option<usize>,
}

/// Fully validated settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub maildirs: Vec<PathBuf>,
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub list_naming: ListNaming,
    pub addressbook_command: Option<Vec<String>>,
    pub add_unmatched: bool,
    pub scan: ScanOptions,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read a config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load the explicit file, or the first default location that exists
    ///
    /// Without an explicit path a missing file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            let expanded = expand(&path.to_string_lossy());
            return Self::from_file(&expanded);
        }

        match default_locations().into_iter().find(|path| path.is_file()) {
            Some(path) => {
                debug!("Using config file {}", path.display());
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if !overrides.maildir.is_empty() {
            self.maildir = overrides.maildir;
        }
        if !overrides.addresses.is_empty() {
            self.addresses = overrides.addresses;
        }
        if !overrides.filters.is_empty() {
            self.filters = overrides.filters;
        }
        self.outputpath = overrides.outputpath.or(self.outputpath.take());
        self.template = overrides.template.or(self.template.take());
        self.list_template = overrides.list_template.or(self.list_template.take());
        self.addr_book_cmd = overrides.addr_book_cmd.or(self.addr_book_cmd.take());
        self.addr_book_add_unmatched |= overrides.addr_book_add_unmatched;
        if let Some(format) = overrides.format {
            self.format = format;
        }
        self.workers = overrides.workers.or(self.workers);
    }

    /// Validate and compile everything the run needs
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        if self.maildir.is_empty() {
            return Err(ConfigError::NoMaildir);
        }

        let maildirs = self.maildir.iter().map(|dir| expand(dir)).collect();
        let output_path = self
            .outputpath
            .as_deref()
            .map_or_else(default_output_path, expand);

        let format = match self.format {
            FormatKind::Json => OutputFormat::Json,
            FormatKind::Template => {
                let source = self.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
                let template = Template::line(source).map_err(|source| ConfigError::Template {
                    which: "output",
                    source,
                })?;
                OutputFormat::Template(template)
            }
        };

        let list_naming = ListNaming::from_config(self.list_template.as_deref()).map_err(
            |source| ConfigError::Template {
                which: "list",
                source,
            },
        )?;

        let addressbook_command = self
            .addr_book_cmd
            .as_deref()
            .map(split_command)
            .transpose()?;

        let scan = ScanOptions {
            owners: OwnerPatterns::new(compile_patterns(&self.addresses)?),
            filter: AddressFilter::new(compile_patterns(&self.filters)?),
            workers: self.workers.unwrap_or_else(default_worker_count),
            path_queue_capacity: DEFAULT_PATH_QUEUE_CAPACITY,
        };

        Ok(Settings {
            maildirs,
            output_path,
            format,
            list_naming,
            addressbook_command,
            add_unmatched: self.addr_book_add_unmatched,
            scan,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>, ConfigError> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                source,
            })
        })
        .collect()
}

fn split_command(command: &str) -> Result<Vec<String>, ConfigError> {
    let argv = shell_words::split(command).map_err(|e| ConfigError::AddressBookCommand {
        command: command.to_string(),
        details: e.to_string(),
    })?;
    if argv.is_empty() {
        return Err(ConfigError::AddressBookCommand {
            command: command.to_string(),
            details: "no program given".into(),
        });
    }
    Ok(argv)
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join(APP_DIR).join("config.toml"));
    }
    locations.push(PathBuf::from("config.toml"));
    locations
}

/// `<cache dir>/maildir-rank-addr/addressbook.tsv`
#[must_use]
pub fn default_output_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("addressbook.tsv")
}
