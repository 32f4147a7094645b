//! # dirsift
//!
//! Recursive, cancellable filename search over a directory tree.
//!
//! dirsift walks a directory depth-first and matches every file and directory
//! name against a case-insensitive substring. Matches stream into an
//! [`EventSink`] the moment they are found, so a caller can render results
//! while the walk is still running. Directories that cannot be listed are
//! reported as [`ErrorEvent`]s and skipped; the rest of the search carries on.
//! Symbolic links are never followed.
//!
//! # Quick Start
//!
//! ```rust
//! use dirsift::{Collector, EntryKind};
//!
//! let dir = tempfile::tempdir().unwrap();
//! std::fs::write(dir.path().join("Apple.txt"), "").unwrap();
//! std::fs::create_dir(dir.path().join("banana")).unwrap();
//! std::fs::write(dir.path().join("banana").join("apple2.txt"), "").unwrap();
//!
//! let sink = Collector::new();
//! let stats = dirsift::search(dir.path(), "apple", &sink).unwrap();
//!
//! assert_eq!(stats.files_found, 2);
//! assert_eq!(stats.directories_found, 0);
//!
//! let matches = sink.matches();
//! assert_eq!(matches[0].kind, EntryKind::File);
//! assert_eq!(matches[0].rendered_name, "<b>apple</b>.txt");
//! ```
//!
//! # Configuring a Search
//!
//! [`builder()`] exposes threading, depth limits, emphasis markers, symlink
//! reporting and cancellation:
//!
//! ```rust
//! use dirsift::{CancelToken, Emphasis, NullSink};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let token = CancelToken::new();
//!
//! let results = dirsift::builder()
//!     .root(dir.path())
//!     .term("invoice")
//!     .threads(4)
//!     .max_depth(3)
//!     .emphasis(Emphasis::none())
//!     .cancel_token(token.clone())
//!     .run(&NullSink)
//!     .unwrap();
//!
//! assert!(!results.cancelled);
//! println!("visited {} entries in {:.3}s",
//!     results.scan.entries,
//!     results.scan.duration.as_secs_f64()
//! );
//! ```

#![forbid(unsafe_code)]

mod builder;
mod cancel;
mod engine;
mod entry;
mod error;
mod event;
mod matcher;
mod results;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::SearchBuilder;
pub use cancel::CancelToken;
pub use entry::EntryKind;
pub use error::SearchError;
pub use event::{ErrorEvent, ErrorReason, MatchEvent};
pub use matcher::{matches, render, render_with, Emphasis, NameMatcher};
pub use results::{Results, ScanStats, Stats};
pub use traits::{Collector, EventSink, NullSink};

use std::path::Path;

// ── Entry points ──────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure and run a search.
pub fn builder() -> SearchBuilder {
    SearchBuilder::default()
}

/// Search `root` for entries whose name contains `term`, ignoring case.
///
/// Events go to `sink` as they are found, in sorted depth-first pre-order.
/// Returns the final counts once the whole tree has been walked.
///
/// # Errors
///
/// [`SearchError::InvalidRoot`] if `root` is not an existing directory and
/// [`SearchError::EmptyTerm`] if `term` is empty. Nothing is emitted in
/// either case.
pub fn search(
    root: impl AsRef<Path>,
    term: &str,
    sink: &dyn EventSink,
) -> Result<Stats, SearchError> {
    search_with_cancel(root, term, sink, &CancelToken::new())
}

/// [`search`] that stops early once `cancel` is cancelled, returning the
/// counts accumulated up to that point.
pub fn search_with_cancel(
    root: impl AsRef<Path>,
    term: &str,
    sink: &dyn EventSink,
    cancel: &CancelToken,
) -> Result<Stats, SearchError> {
    builder()
        .root(root.as_ref())
        .term(term)
        .cancel_token(cancel.clone())
        .run(sink)
        .map(|results| results.stats)
}
