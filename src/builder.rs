use std::path::PathBuf;

use crate::cancel::CancelToken;
use crate::engine::{run, EngineOptions, WalkConfig};
use crate::error::SearchError;
use crate::matcher::{Emphasis, NameMatcher};
use crate::results::Results;
use crate::traits::EventSink;

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a search.
///
/// Created via [`dirsift::builder()`](crate::builder). Configure with chained
/// builder methods, then call [`run()`](SearchBuilder::run) with a sink.
///
/// # Example
///
/// ```rust,ignore
/// let results = dirsift::builder()
///     .root("/data")
///     .term("invoice")
///     .threads(4)
///     .cancel_token(token.clone())
///     .run(&collector)?;
/// ```
pub struct SearchBuilder {
    root:             Option<PathBuf>,
    term:             String,
    threads:          usize,
    max_depth:        Option<usize>,
    emphasis:         Emphasis,
    report_symlinks:  bool,
    allow_empty_term: bool,
    cancel:           CancelToken,
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self {
            root:             None,
            term:             String::new(),
            threads:          1,
            max_depth:        None,
            emphasis:         Emphasis::default(),
            report_symlinks:  false,
            allow_empty_term: false,
            cancel:           CancelToken::new(),
        }
    }
}

impl SearchBuilder {
    // ── Inputs ────────────────────────────────────────────────────────────

    /// The directory to search. Must exist.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The substring to look for in entry names. Case-insensitive.
    pub fn term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Number of threads to use for traversal.
    ///
    /// Defaults to `1`: a single-threaded walk whose events arrive in sorted
    /// depth-first pre-order. Higher values walk sibling directories
    /// concurrently on a pool of exactly that many workers; counts are the
    /// same but event order is unspecified. `0` is rejected.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n;
        self
    }

    /// Maximum traversal depth. `1` means the root's direct entries only.
    /// Unlimited by default.
    pub fn max_depth(mut self, d: usize) -> Self {
        self.max_depth = Some(d);
        self
    }

    /// Markers wrapped around the matched part of rendered names.
    /// Defaults to `<b>`/`</b>`.
    pub fn emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Report matching symbolic links as [`EntryKind::SymbolicLink`]
    /// events counted in [`Stats::links_found`].
    ///
    /// Off by default: links to regular files are then reported as files and
    /// every other link is skipped. Links are never descended either way.
    ///
    /// [`EntryKind::SymbolicLink`]: crate::EntryKind::SymbolicLink
    /// [`Stats::links_found`]: crate::Stats::links_found
    pub fn report_symlinks(mut self, yes: bool) -> Self {
        self.report_symlinks = yes;
        self
    }

    /// Accept an empty term, which matches every entry.
    ///
    /// Disabled by default: an empty term is rejected with
    /// [`SearchError::EmptyTerm`].
    pub fn allow_empty_term(mut self, yes: bool) -> Self {
        self.allow_empty_term = yes;
        self
    }

    /// Token checked before every entry. Cancel it from any thread (or from
    /// inside the sink) to stop the walk early.
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the search, streaming events into `sink`.
    ///
    /// Blocks until the walk completes or is cancelled.
    ///
    /// # Errors
    ///
    /// Returns `Err` only for boundary errors, before any event is emitted:
    /// a root that is not an existing directory, an empty term (unless
    /// allowed), or a thread count of zero. Directories that cannot be
    /// listed during the walk are reported to the sink instead.
    pub fn run(self, sink: &dyn EventSink) -> Result<Results, SearchError> {
        let root = self.root.unwrap_or_default();
        if !root.is_dir() {
            return Err(SearchError::InvalidRoot(root));
        }
        if self.term.is_empty() && !self.allow_empty_term {
            return Err(SearchError::EmptyTerm);
        }
        if self.threads == 0 {
            return Err(SearchError::InvalidThreadCount(0));
        }

        let opts = EngineOptions {
            config: WalkConfig {
                threads:   self.threads,
                max_depth: self.max_depth,
            },
            matcher:         NameMatcher::new(&self.term, self.emphasis),
            report_symlinks: self.report_symlinks,
            cancel:          self.cancel,
        };

        Ok(run(&root, &opts, sink))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::NullSink;

    #[test]
    fn missing_root_is_invalid() {
        let err = SearchBuilder::default().term("x").run(&NullSink).unwrap_err();
        assert!(matches!(err, SearchError::InvalidRoot(_)));
    }

    #[test]
    fn file_root_is_invalid() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let err = SearchBuilder::default()
            .root(file.path())
            .term("x")
            .run(&NullSink)
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidRoot(p) if p == file.path()));
    }

    #[test]
    fn empty_term_rejected_unless_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let err = SearchBuilder::default().root(dir.path()).run(&NullSink).unwrap_err();
        assert!(matches!(err, SearchError::EmptyTerm));

        let results = SearchBuilder::default()
            .root(dir.path())
            .allow_empty_term(true)
            .run(&NullSink)
            .unwrap();
        assert_eq!(results.stats.total(), 0);
    }

    #[test]
    fn zero_threads_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = SearchBuilder::default()
            .root(dir.path())
            .term("x")
            .threads(0)
            .run(&NullSink)
            .unwrap_err();
        assert!(matches!(err, SearchError::InvalidThreadCount(0)));
    }
}
