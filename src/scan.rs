//! Concurrent maildir scanning
//!
//! Three stages connected by channels:
//!
//! ```text
//! walker ──paths (bounded)──▶ parser pool (N threads) ──headers──▶ aggregator
//! ```
//!
//! The walker runs on its own thread and blocks when the path queue is full.
//! Workers compete for paths and send one item per message. The aggregator
//! runs on the calling thread and is the only writer of the address map.

use crate::aggregate::{Aggregator, ScanStats};
use crate::classify::OwnerPatterns;
use crate::error::{Error, ParseResult, Result};
use crate::filter::AddressFilter;
use crate::merge::merge_sources;
use crate::parser::extract_file;
use crate::types::{AddressMap, MessageHeader};
use crossbeam_channel::{Receiver, Sender};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

/// Maildir subdirectories that hold message files
pub const MAILDIR_SUBDIRS: [&str; 3] = ["new", "cur", "tmp"];

/// Directory names that never contain mail
pub const SKIPPED_DIRS: [&str; 2] = ["lost+found", "@eaDir"];

/// Default capacity of the path queue between walker and workers
pub const DEFAULT_PATH_QUEUE_CAPACITY: usize = 4096;

/// Twice the available parallelism; parsing is as much I/O as CPU
#[must_use]
pub fn default_worker_count() -> usize {
    thread::available_parallelism().map_or(2, |n| n.get() * 2)
}

/// Everything the scan needs besides the roots
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub owners: OwnerPatterns,
    pub filter: AddressFilter,
    pub workers: usize,
    pub path_queue_capacity: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            owners: OwnerPatterns::default(),
            filter: AddressFilter::default(),
            workers: default_worker_count(),
            path_queue_capacity: DEFAULT_PATH_QUEUE_CAPACITY,
        }
    }
}

/// Aggregated result of one or more roots
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub addresses: AddressMap,
    pub stats: ScanStats,
}

/// Scan every root and merge the results
///
/// A root that cannot be opened aborts the run; a walk that fails halfway
/// keeps whatever it aggregated.
pub fn walk_maildirs<P: AsRef<Path>>(roots: &[P], options: &ScanOptions) -> Result<ScanOutcome> {
    let mut outcome = ScanOutcome::default();
    for root in roots {
        let scanned = walk_maildir(root.as_ref(), options)?;
        outcome.addresses = merge_sources(outcome.addresses, scanned.addresses);
        outcome.stats.absorb(&scanned.stats);
    }
    Ok(outcome)
}

/// Scan one maildir root
pub fn walk_maildir(root: &Path, options: &ScanOptions) -> Result<ScanOutcome> {
    std::fs::metadata(root).map_err(|source| Error::RootUnreadable {
        path: root.to_path_buf(),
        source,
    })?;

    let (path_tx, path_rx) =
        crossbeam_channel::bounded::<PathBuf>(options.path_queue_capacity.max(1));
    let (header_tx, header_rx) = crossbeam_channel::unbounded::<ParseResult<MessageHeader>>();

    let pool = ParserPool::spawn(options.workers, &path_rx, &header_tx)?;
    // Channel disconnection is driven by the walker and the workers alone
    drop(path_rx);
    drop(header_tx);

    let walker = spawn_walker(root.to_path_buf(), path_tx)?;

    let mut aggregator = Aggregator::new(&options.owners, &options.filter);
    for outcome in &header_rx {
        aggregator.ingest(outcome);
    }

    let walked = walker
        .join()
        .map_err(|_| Error::WorkerPanicked("walker"))?;
    let pool_stats = pool.join()?;
    let (addresses, messages_parsed, messages_rejected) = aggregator.finish();

    let mut stats = ScanStats {
        files_read: pool_stats.files_read,
        files_failed: pool_stats.files_failed,
        messages_parsed,
        messages_rejected,
        walk_errors: 0,
    };

    match walked {
        Ok(enqueued) => debug!("Walked {enqueued} candidate files in {}", root.display()),
        Err(Error::Walk { path, source }) if source.depth() > 0 => {
            error!("Walk of {} aborted at {}: {source}", root.display(), path.display());
            stats.walk_errors += 1;
        }
        Err(e) => return Err(e),
    }

    info!(
        "Read {} files of which {} could be parsed ({} messages, {} rejected) in {}",
        stats.files_read,
        stats.files_parsed(),
        stats.messages_parsed,
        stats.messages_rejected,
        root.display()
    );

    Ok(ScanOutcome { addresses, stats })
}

/// Whether the walk should enter or yield this entry
fn is_walkable(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let name = entry.file_name().to_string_lossy();
    if name.starts_with('.') {
        return false;
    }
    if entry.file_type().is_dir() {
        // Maildir subfolders are flat; anything nested in them is not mail
        return !SKIPPED_DIRS.contains(&name.as_ref()) && !in_maildir_subdir(entry.path());
    }
    true
}

/// Whether `path` sits directly inside a `new`, `cur` or `tmp` directory
fn in_maildir_subdir(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .and_then(OsStr::to_str)
        .is_some_and(|parent| MAILDIR_SUBDIRS.contains(&parent))
}

/// Lazily enumerate the message candidates below `root`
///
/// A root that is itself a file (an mbox, typically) is its only candidate.
pub fn candidate_files(root: &Path) -> impl Iterator<Item = Result<PathBuf>> + use<> {
    let root = root.to_path_buf();
    WalkDir::new(&root)
        .follow_links(false)
        .into_iter()
        .filter_entry(is_walkable)
        .filter_map(move |entry| match entry {
            Ok(entry) => {
                let is_candidate = entry.file_type().is_file()
                    && (entry.depth() == 0 || in_maildir_subdir(entry.path()));
                is_candidate.then(|| Ok(entry.into_path()))
            }
            Err(source) => Some(Err(Error::Walk {
                path: source.path().map_or_else(|| root.clone(), Path::to_path_buf),
                source,
            })),
        })
}

/// Feed candidate paths into the queue; stops at the first walk error
fn spawn_walker(root: PathBuf, paths: Sender<PathBuf>) -> Result<JoinHandle<Result<usize>>> {
    thread::Builder::new()
        .name("maildir-walker".into())
        .spawn(move || {
            let mut enqueued = 0usize;
            for candidate in candidate_files(&root) {
                let path = candidate?;
                if paths.send(path).is_err() {
                    warn!("All parser workers are gone, stopping walk of {}", root.display());
                    break;
                }
                enqueued += 1;
            }
            Ok(enqueued)
        })
        .map_err(|source| Error::WorkerSpawn {
            name: "maildir-walker".into(),
            source,
        })
}

/// Per-worker file counters
#[derive(Debug, Clone, Copy, Default)]
pub struct WorkerStats {
    pub files_read: usize,
    pub files_failed: usize,
}

/// Fixed set of header-parsing threads
#[derive(Debug)]
pub struct ParserPool {
    handles: Vec<JoinHandle<WorkerStats>>,
}

impl ParserPool {
    /// Start `workers` threads consuming `paths` and producing into `headers`
    pub fn spawn(
        workers: usize,
        paths: &Receiver<PathBuf>,
        headers: &Sender<ParseResult<MessageHeader>>,
    ) -> Result<Self> {
        let worker_count = workers.max(1);
        let mut handles = Vec::with_capacity(worker_count);

        for worker_idx in 0..worker_count {
            let rx = paths.clone();
            let tx = headers.clone();
            let name = format!("header-parser-{worker_idx}");
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || parse_worker(&rx, &tx))
                .map_err(|source| Error::WorkerSpawn { name, source })?;
            handles.push(handle);
        }

        Ok(Self { handles })
    }

    /// Wait for every worker and sum their counters
    pub fn join(self) -> Result<WorkerStats> {
        let mut total = WorkerStats::default();
        for handle in self.handles {
            let stats = handle
                .join()
                .map_err(|_| Error::WorkerPanicked("header parser"))?;
            total.files_read += stats.files_read;
            total.files_failed += stats.files_failed;
        }
        Ok(total)
    }
}

fn parse_worker(paths: &Receiver<PathBuf>, headers: &Sender<ParseResult<MessageHeader>>) -> WorkerStats {
    let mut stats = WorkerStats::default();

    for path in paths {
        stats.files_read += 1;
        match extract_file(&path) {
            Ok(file) => {
                for message in file.messages {
                    if headers.send(message).is_err() {
                        return stats;
                    }
                }
            }
            Err(e) => {
                stats.files_failed += 1;
                let message = e.to_string();
                if message.chars().any(char::is_control) {
                    warn!("{}: mail reader error, probably tried reading binary", path.display());
                } else {
                    warn!("{}: {message}", path.display());
                }
            }
        }
    }

    stats
}
