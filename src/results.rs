use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Match counts for one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Matching regular files (including symlinks to files unless symlinks
    /// are reported separately).
    pub files_found: usize,

    /// Matching directories. Symlinked directories are never counted here.
    pub directories_found: usize,

    /// Matching symlinks. Only counted when symlink reporting is enabled.
    pub links_found: usize,
}

impl Stats {
    /// Total matches of every kind.
    pub fn total(&self) -> usize {
        self.files_found + self.directories_found + self.links_found
    }
}

/// The output of a completed (or cancelled) search.
#[derive(Debug, Clone)]
pub struct Results {
    pub stats: Stats,

    /// Traversal performance statistics.
    pub scan: ScanStats,

    /// Number of directories that could not be listed.
    pub errors: usize,

    /// `true` if the search stopped early because its token was cancelled.
    /// `stats` then reflects only the entries visited before that.
    pub cancelled: bool,
}

/// Performance statistics for a completed scan.
#[derive(Debug, Clone, Copy)]
pub struct ScanStats {
    /// Total number of entries visited, matched or not. The root is excluded.
    pub entries: usize,

    /// Wall-clock time from search start to completion.
    pub duration: Duration,

    /// Entries visited per second, clamped to 0 on zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    pub(crate) fn compute(entries: usize, duration: Duration) -> Self {
        let eps = if duration.as_secs_f64() > 0.0 {
            (entries as f64 / duration.as_secs_f64()) as usize
        } else {
            0
        };
        Self {
            entries,
            duration,
            entries_per_sec: eps,
        }
    }
}

/// Running counters owned by a single search invocation.
///
/// Atomic so the same accumulator serves the sequential walk and the worker
/// pool of a parallel one.
#[derive(Debug, Default)]
pub(crate) struct Tally {
    files: AtomicUsize,
    dirs: AtomicUsize,
    links: AtomicUsize,
    entries: AtomicUsize,
    errors: AtomicUsize,
}

impl Tally {
    pub fn visited(&self) {
        self.entries.fetch_add(1, Ordering::Relaxed);
    }

    pub fn file(&self) {
        self.files.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dir(&self) {
        self.dirs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn link(&self) {
        self.links.fetch_add(1, Ordering::Relaxed);
    }

    pub fn error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> Stats {
        Stats {
            files_found: self.files.load(Ordering::Relaxed),
            directories_found: self.dirs.load(Ordering::Relaxed),
            links_found: self.links.load(Ordering::Relaxed),
        }
    }

    pub fn entries(&self) -> usize {
        self.entries.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }
}
