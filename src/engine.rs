use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use ignore::{DirEntry, WalkBuilder, WalkState};
use tracing::{debug, info, trace, warn};

use crate::cancel::CancelToken;
use crate::entry::{Entry, EntryKind};
use crate::error::SearchError;
use crate::event::{ErrorEvent, MatchEvent};
use crate::matcher::NameMatcher;
use crate::results::{Results, ScanStats, Tally};
use crate::traits::EventSink;

// ---------------------------------------------------------------------------
// WalkConfig
// ---------------------------------------------------------------------------

/// Traversal parameters passed from the builder to the engine.
pub(crate) struct WalkConfig {
    /// `1` walks on the calling thread in sorted pre-order. Anything larger
    /// fans out over a bounded worker pool.
    pub threads:   usize,
    pub max_depth: Option<usize>,
}

// ---------------------------------------------------------------------------
// Engine options
// ---------------------------------------------------------------------------

/// Internal options passed from the builder to `run()`.
pub(crate) struct EngineOptions {
    pub config:          WalkConfig,
    pub matcher:         NameMatcher,
    pub report_symlinks: bool,
    pub cancel:          CancelToken,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk `root`, streaming events into `sink`, and return the final counts.
///
/// Called by `SearchBuilder::run()` after validating inputs. Nothing in here
/// fails: directories that cannot be listed become [`ErrorEvent`]s and the
/// walk continues with their siblings.
pub(crate) fn run(root: &Path, opts: &EngineOptions, sink: &dyn EventSink) -> Results {
    debug!(
        root = %root.display(),
        term = opts.matcher.needle(),
        threads = opts.config.threads,
        max_depth = ?opts.config.max_depth,
        "starting search"
    );

    let tally = Tally::default();
    let visitor = Visitor {
        root,
        opts,
        sink,
        tally: &tally,
    };

    let mut builder = WalkBuilder::new(root);
    builder
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(false)
        .same_file_system(false)
        .max_depth(opts.config.max_depth);

    let start = Instant::now();

    if opts.config.threads <= 1 {
        // Raw byte order of names, before any lowercasing.
        builder.sort_by_file_name(|a, b| a.cmp(b));
        for res in builder.build() {
            if matches!(visitor.visit(res), WalkState::Quit) {
                break;
            }
        }
    } else {
        builder.threads(opts.config.threads);
        builder.build_parallel().run(|| {
            let visitor = &visitor;
            Box::new(move |res| visitor.visit(res))
        });
    }

    let duration  = start.elapsed();
    let stats     = tally.stats();
    let cancelled = opts.cancel.is_cancelled();

    if cancelled {
        info!(
            files = stats.files_found,
            dirs = stats.directories_found,
            "search cancelled"
        );
    }
    debug!(
        files = stats.files_found,
        dirs = stats.directories_found,
        links = stats.links_found,
        errors = tally.errors(),
        elapsed_ms = duration.as_millis() as u64,
        "search finished"
    );

    Results {
        stats,
        scan: ScanStats::compute(tally.entries(), duration),
        errors: tally.errors(),
        cancelled,
    }
}

// ---------------------------------------------------------------------------
// Visitor
// ---------------------------------------------------------------------------

/// Per-entry logic shared by the sequential and the parallel walk.
struct Visitor<'a> {
    root:  &'a Path,
    opts:  &'a EngineOptions,
    sink:  &'a dyn EventSink,
    tally: &'a Tally,
}

impl Visitor<'_> {
    fn visit(&self, res: Result<DirEntry, ignore::Error>) -> WalkState {
        if self.opts.cancel.is_cancelled() {
            return WalkState::Quit;
        }

        let dent = match res {
            Ok(d) => d,
            Err(e) => {
                self.report(map_ignore_error(e));
                return WalkState::Continue;
            }
        };

        // The root is searched, never reported.
        if dent.depth() == 0 {
            return WalkState::Continue;
        }

        self.tally.visited();
        let entry = Entry::from_dir_entry(&dent);

        let Some(rendered) = self.opts.matcher.check(&entry.name) else {
            return WalkState::Continue;
        };

        match entry.kind {
            EntryKind::Directory => {
                self.tally.dir();
                self.emit(&entry, EntryKind::Directory, rendered);
            }
            EntryKind::File => {
                self.tally.file();
                self.emit(&entry, EntryKind::File, rendered);
            }
            EntryKind::SymbolicLink if self.opts.report_symlinks => {
                self.tally.link();
                self.emit(&entry, EntryKind::SymbolicLink, rendered);
            }
            // A link that resolves to a regular file passes the file test;
            // links to directories and dangling links are skipped.
            EntryKind::SymbolicLink if entry.link_targets_file() => {
                self.tally.file();
                self.emit(&entry, EntryKind::File, rendered);
            }
            EntryKind::SymbolicLink | EntryKind::Inaccessible => {
                trace!(path = %entry.path.display(), kind = ?entry.kind, "skipping match");
            }
        }

        WalkState::Continue
    }

    fn emit(&self, entry: &Entry, kind: EntryKind, rendered_name: String) {
        trace!(path = %entry.path.display(), depth = entry.depth, kind = ?kind, "match");
        let event = MatchEvent {
            kind,
            path: entry.path.clone(),
            rendered_name,
        };
        self.sink.on_match(&event);
        self.sink.on_progress(&self.tally.stats());
    }

    fn report(&self, err: SearchError) {
        self.tally.error();
        let event = ErrorEvent::from_error(&err, self.root);
        warn!(path = %event.path.display(), reason = ?event.reason, "cannot list directory");
        self.sink.on_error(&event);
    }
}

// ---------------------------------------------------------------------------
// Map ignore::Error to SearchError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> SearchError {
    map_with_path(e, None)
}

/// `ignore` nests the I/O error under depth and path wrappers. Peel them off,
/// keeping the innermost path seen.
fn map_with_path(e: ignore::Error, path: Option<PathBuf>) -> SearchError {
    match e {
        ignore::Error::WithPath { path, err } => map_with_path(*err, Some(path)),
        ignore::Error::WithDepth { err, .. } => map_with_path(*err, path),
        ignore::Error::WithLineNumber { err, .. } => map_with_path(*err, path),
        ignore::Error::Partial(mut errs) if !errs.is_empty() => {
            map_with_path(errs.swap_remove(0), path)
        }
        ignore::Error::Io(io_err) => SearchError::from_io(path.unwrap_or_default(), io_err),
        ignore::Error::Loop { child, .. } => SearchError::Io {
            path:   child,
            source: io::Error::other("filesystem loop"),
        },
        other => SearchError::Io {
            path:   path.unwrap_or_default(),
            source: io::Error::other(other.to_string()),
        },
    }
}
