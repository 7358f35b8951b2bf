use anyhow::{Context, Result};
use clap::Parser;
use maildir_rank_addr::config::{Config, ConfigOverrides};
use maildir_rank_addr::output::{FormatKind, save_addresses, unmatched_entries};
use maildir_rank_addr::{AddressBook, calculate_ranks, walk_maildirs};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "maildir-rank-addr")]
#[command(about = "Rank the addresses in your maildirs by frequency and recency", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Maildir folders to scan
    #[arg(long, value_delimiter = ',')]
    maildir: Vec<String>,

    /// Path to output file
    #[arg(long)]
    outputpath: Option<String>,

    /// Output line template, e.g. "{address}\t{name}"
    #[arg(long)]
    template: Option<String>,

    /// Template naming mailing-list addresses, DISABLELIST to turn off
    #[arg(long)]
    list_template: Option<String>,

    /// Command printing "address<TAB>name" lines from your address book
    #[arg(long)]
    addr_book_cmd: Option<String>,

    /// Add address-book contacts not found in any maildir to the output
    #[arg(long)]
    addr_book_add_unmatched: bool,

    /// Your own email addresses (regex possible)
    #[arg(long, value_delimiter = ',')]
    addresses: Vec<String>,

    /// Regexes of addresses to filter out
    #[arg(long, value_delimiter = ',')]
    filters: Vec<String>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<FormatKind>,

    /// Number of header parser threads
    #[arg(long)]
    workers: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Log only warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            maildir: self.maildir.clone(),
            outputpath: self.outputpath.clone(),
            template: self.template.clone(),
            list_template: self.list_template.clone(),
            addr_book_cmd: self.addr_book_cmd.clone(),
            addr_book_add_unmatched: self.addr_book_add_unmatched,
            addresses: self.addresses.clone(),
            filters: self.filters.clone(),
            format: self.format,
            workers: self.workers,
        }
    }
}

fn init_tracing(cli: &Cli) {
    let default = if cli.verbose {
        "maildir_rank_addr=debug,info"
    } else if cli.quiet {
        "warn"
    } else {
        "maildir_rank_addr=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    config.apply(cli.overrides());
    let settings = config
        .into_settings()
        .context("invalid configuration (is --maildir set?)")?;

    let mut book = match &settings.addressbook_command {
        Some(argv) => AddressBook::from_command(argv)?,
        None => AddressBook::new(),
    };

    info!(
        "Scanning {} maildir(s) with {} workers",
        settings.maildirs.len(),
        settings.scan.workers
    );
    let outcome = walk_maildirs(&settings.maildirs, &settings.scan)?;

    let classed = calculate_ranks(outcome.addresses, &mut book, &settings.list_naming);
    let unmatched = if settings.add_unmatched {
        unmatched_entries(&book)
    } else {
        Vec::new()
    };

    let count = save_addresses(&settings.output_path, &classed, &settings.format, &unmatched)?;
    println!("{count} addresses written to {}", settings.output_path.display());
    Ok(())
}
