use std::path::PathBuf;

use ignore::DirEntry;

/// The kind of a traversed entry.
///
/// Symbolic links are classified by the link itself, never by what it points
/// at. The walker never descends through one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Directory,

    /// A symbolic link, whatever its target.
    SymbolicLink,

    /// An entry whose type could not be determined.
    Inaccessible,
}

impl EntryKind {
    /// Lowercase label used by the command-line output.
    pub fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::SymbolicLink => "link",
            Self::Inaccessible => "inaccessible",
        }
    }
}

/// A single directory entry as seen by the walker.
pub(crate) struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// The entry's file name, lossily converted to UTF-8.
    pub name: String,

    pub kind: EntryKind,

    /// Depth below the search root. Root = 0.
    pub depth: usize,
}

impl Entry {
    pub fn from_dir_entry(entry: &DirEntry) -> Self {
        let kind = match entry.file_type() {
            _ if entry.path_is_symlink() => EntryKind::SymbolicLink,
            Some(ft) if ft.is_symlink() => EntryKind::SymbolicLink,
            Some(ft) if ft.is_dir() => EntryKind::Directory,
            Some(ft) if ft.is_file() => EntryKind::File,
            // Device files, pipes, sockets and entries without a type.
            _ => EntryKind::Inaccessible,
        };

        Self {
            path: entry.path().to_path_buf(),
            name: entry.file_name().to_string_lossy().into_owned(),
            kind,
            depth: entry.depth(),
        }
    }

    /// Whether a symlink resolves to a regular file. Broken links and links
    /// to directories do not.
    pub fn link_targets_file(&self) -> bool {
        self.kind == EntryKind::SymbolicLink
            && std::fs::metadata(&self.path)
                .map(|m| m.is_file())
                .unwrap_or(false)
    }
}
