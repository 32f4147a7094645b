use std::io;
use std::path::{Path, PathBuf};

use crate::entry::EntryKind;
use crate::error::SearchError;

/// One matching entry, delivered to the sink as soon as the walker reaches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchEvent {
    pub kind: EntryKind,

    /// Full path of the entry, exactly as found on disk.
    pub path: PathBuf,

    /// Lowercased file name with the matched term wrapped in emphasis markers.
    pub rendered_name: String,
}

impl MatchEvent {
    /// The parent directory joined with the rendered name, e.g.
    /// `/data/<b>apple</b>.txt`. This is what a result list shows.
    pub fn display_path(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) => parent.join(&self.rendered_name),
            None => PathBuf::from(&self.rendered_name),
        }
    }
}

/// Why a directory could not be listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    AccessDenied,

    /// The directory disappeared between being discovered and being listed.
    NotFound,

    Io(io::ErrorKind),
}

/// A directory the walker could not enumerate. Its subtree is skipped; the
/// rest of the search carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEvent {
    pub path: PathBuf,
    pub reason: ErrorReason,
}

impl ErrorEvent {
    pub fn new(path: impl AsRef<Path>, reason: ErrorReason) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            reason,
        }
    }

    /// Convert a recoverable traversal error. `fallback` is used when the
    /// error carries no path of its own.
    pub(crate) fn from_error(err: &SearchError, fallback: &Path) -> Self {
        let reason = match err {
            SearchError::PermissionDenied(_) => ErrorReason::AccessDenied,
            SearchError::NotFound(_) => ErrorReason::NotFound,
            SearchError::Io { source, .. } => ErrorReason::Io(source.kind()),
            _ => ErrorReason::Io(io::ErrorKind::Other),
        };
        let path = match err.path() {
            Some(p) if !p.as_os_str().is_empty() => p.as_path(),
            _ => fallback,
        };
        Self::new(path, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_path_swaps_in_rendered_name() {
        let event = MatchEvent {
            kind: EntryKind::File,
            path: PathBuf::from("/root/banana/Apple2.txt"),
            rendered_name: "<b>apple</b>2.txt".into(),
        };
        assert_eq!(
            event.display_path(),
            PathBuf::from("/root/banana/<b>apple</b>2.txt")
        );
    }

    #[test]
    fn error_event_falls_back_when_pathless() {
        let err = SearchError::Io {
            path: PathBuf::new(),
            source: io::Error::from(io::ErrorKind::Interrupted),
        };
        let event = ErrorEvent::from_error(&err, Path::new("/root"));
        assert_eq!(event.path, PathBuf::from("/root"));
        assert_eq!(event.reason, ErrorReason::Io(io::ErrorKind::Interrupted));

        let denied = SearchError::PermissionDenied("/root/secret".into());
        let event = ErrorEvent::from_error(&denied, Path::new("/root"));
        assert_eq!(event, ErrorEvent::new("/root/secret", ErrorReason::AccessDenied));
    }
}
