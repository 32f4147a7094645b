use std::io::{self, Write};
use std::sync::Mutex;

use dirsift::{CancelToken, EntryKind, ErrorEvent, ErrorReason, EventSink, MatchEvent, Results, Stats};
use serde_json::{json, Value};
use tracing::debug;

use crate::cli::OutputFormat;

/// Line printed for one match, e.g. `File: /data/<b>apple</b>.txt`.
pub(crate) fn format_match(event: &MatchEvent) -> String {
    // Files are capitalised in the result list; every other kind is not.
    let label = match event.kind {
        EntryKind::File => "File",
        kind => kind.label(),
    };
    format!("{label}: {}", event.display_path().display())
}

pub(crate) fn format_error(event: &ErrorEvent) -> String {
    match event.reason {
        ErrorReason::AccessDenied => format!("Denied access to {}.", event.path.display()),
        ErrorReason::NotFound => format!("Vanished during search: {}.", event.path.display()),
        ErrorReason::Io(kind) => format!("Could not read {} ({kind}).", event.path.display()),
    }
}

/// Status-bar text: running while searching, final once done.
pub(crate) fn format_status(stats: &Stats, still_searching: bool) -> String {
    let head = if still_searching {
        "Searching..."
    } else {
        "Search Complete."
    };
    let mut line = format!(
        "{head}  Files Found: {}  Directories Found: {}",
        stats.files_found, stats.directories_found
    );
    if stats.links_found > 0 {
        line.push_str(&format!("  Links Found: {}", stats.links_found));
    }
    line
}

pub(crate) fn json_match(event: &MatchEvent) -> Value {
    json!({
        "type": "match",
        "kind": event.kind.label(),
        "path": event.path.to_string_lossy(),
        "rendered": event.rendered_name,
    })
}

pub(crate) fn json_error(event: &ErrorEvent) -> Value {
    let reason = match event.reason {
        ErrorReason::AccessDenied => "access_denied".to_string(),
        ErrorReason::NotFound => "not_found".to_string(),
        ErrorReason::Io(kind) => kind.to_string(),
    };
    json!({
        "type": "error",
        "path": event.path.to_string_lossy(),
        "reason": reason,
    })
}

pub(crate) fn json_complete(results: &Results) -> Value {
    json!({
        "type": "complete",
        "files_found": results.stats.files_found,
        "directories_found": results.stats.directories_found,
        "links_found": results.stats.links_found,
        "errors": results.errors,
        "entries_scanned": results.scan.entries,
        "elapsed_ms": results.scan.duration.as_millis() as u64,
        "cancelled": results.cancelled,
    })
}

/// Prints events as they arrive.
///
/// The first failed write (typically a closed pipe) cancels the search so the
/// walk stops instead of visiting the rest of the tree for nobody.
pub(crate) struct Printer<W = io::Stdout> {
    format: OutputFormat,
    progress: bool,
    out: Mutex<W>,
    cancel: CancelToken,
}

impl Printer {
    pub(crate) fn new(format: OutputFormat, progress: bool, cancel: CancelToken) -> Self {
        Self::with_writer(io::stdout(), format, progress, cancel)
    }
}

impl<W: Write + Send> Printer<W> {
    pub(crate) fn with_writer(out: W, format: OutputFormat, progress: bool, cancel: CancelToken) -> Self {
        Self {
            format,
            progress,
            out: Mutex::new(out),
            cancel,
        }
    }

    /// Print the closing line once the search has returned.
    pub(crate) fn finish(&self, results: &Results) -> io::Result<()> {
        if self.progress {
            eprint!("\r\x1b[2K");
        }
        let line = match self.format {
            OutputFormat::Plain => {
                let status = format_status(&results.stats, false);
                if results.cancelled {
                    status.replacen("Search Complete.", "Search Cancelled.", 1)
                } else {
                    status
                }
            }
            OutputFormat::Json => json_complete(results).to_string(),
        };
        let mut out = self
            .out
            .lock()
            .map_err(|_| io::Error::other("output lock poisoned"))?;
        writeln!(out, "{line}")?;
        out.flush()
    }

    fn emit(&self, line: &str) {
        if self.cancel.is_cancelled() {
            return;
        }
        let Ok(mut out) = self.out.lock() else {
            return;
        };
        if let Err(err) = writeln!(out, "{line}") {
            debug!(error = %err, "output closed, stopping search");
            self.cancel.cancel();
        }
    }
}

impl<W: Write + Send> EventSink for Printer<W> {
    fn on_match(&self, event: &MatchEvent) {
        let line = match self.format {
            OutputFormat::Plain => format_match(event),
            OutputFormat::Json => json_match(event).to_string(),
        };
        self.emit(&line);
    }

    fn on_error(&self, event: &ErrorEvent) {
        let line = match self.format {
            OutputFormat::Plain => format_error(event),
            OutputFormat::Json => json_error(event).to_string(),
        };
        self.emit(&line);
    }

    fn on_progress(&self, stats: &Stats) {
        if self.progress && !self.cancel.is_cancelled() {
            let mut err = io::stderr().lock();
            let _ = write!(err, "\r{}", format_status(stats, true));
            let _ = err.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use dirsift::ScanStats;

    use super::*;

    fn apple() -> MatchEvent {
        MatchEvent {
            kind: EntryKind::File,
            path: PathBuf::from("/root/banana/Apple2.txt"),
            rendered_name: "<b>apple</b>2.txt".into(),
        }
    }

    #[test]
    fn plain_lines() {
        assert_eq!(format_match(&apple()), "File: /root/banana/<b>apple</b>2.txt");

        let dir = MatchEvent {
            kind: EntryKind::Directory,
            path: PathBuf::from("/root/Apple"),
            rendered_name: "<b>apple</b>".into(),
        };
        assert_eq!(format_match(&dir), "directory: /root/<b>apple</b>");

        let denied = ErrorEvent::new("/root/secret", ErrorReason::AccessDenied);
        assert_eq!(format_error(&denied), "Denied access to /root/secret.");
    }

    #[test]
    fn status_line() {
        let stats = Stats {
            files_found: 2,
            directories_found: 1,
            links_found: 0,
        };
        assert_eq!(
            format_status(&stats, true),
            "Searching...  Files Found: 2  Directories Found: 1"
        );
        assert_eq!(
            format_status(&stats, false),
            "Search Complete.  Files Found: 2  Directories Found: 1"
        );
    }

    #[test]
    fn json_events() {
        let value = json_match(&apple());
        assert_eq!(value["type"], "match");
        assert_eq!(value["kind"], "file");
        assert_eq!(value["rendered"], "<b>apple</b>2.txt");

        let value = json_error(&ErrorEvent::new("/root/secret", ErrorReason::AccessDenied));
        assert_eq!(value["reason"], "access_denied");
        assert_eq!(value["path"], "/root/secret");
    }

    /// A writer whose reader has gone away.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    fn summary() -> Results {
        Results {
            stats: Stats::default(),
            scan: ScanStats {
                entries: 0,
                duration: Duration::ZERO,
                entries_per_sec: 0,
            },
            errors: 0,
            cancelled: false,
        }
    }

    #[test]
    fn printer_writes_lines_and_summary() {
        let printer = Printer::with_writer(Vec::<u8>::new(), OutputFormat::Plain, false, CancelToken::new());
        printer.on_match(&apple());
        printer.on_error(&ErrorEvent::new("/root/secret", ErrorReason::AccessDenied));
        printer.finish(&summary()).unwrap();

        let text = String::from_utf8(printer.out.into_inner().unwrap()).unwrap();
        assert_eq!(
            text,
            "File: /root/banana/<b>apple</b>2.txt\n\
             Denied access to /root/secret.\n\
             Search Complete.  Files Found: 0  Directories Found: 0\n"
        );
    }

    #[test]
    fn closed_output_cancels_search_and_finish_reports_it() {
        let token = CancelToken::new();
        let printer = Printer::with_writer(ClosedPipe, OutputFormat::Plain, false, token.clone());

        printer.on_match(&apple());
        assert!(token.is_cancelled());

        // Later events are dropped without touching the writer again.
        printer.on_match(&apple());

        let err = printer.finish(&summary()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn closed_output_stops_a_real_walk() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..20 {
            std::fs::write(dir.path().join(format!("apple_{i:02}.txt")), "").unwrap();
        }

        let token = CancelToken::new();
        let printer = Printer::with_writer(ClosedPipe, OutputFormat::Json, false, token.clone());
        let results = dirsift::builder()
            .root(dir.path())
            .term("apple")
            .cancel_token(token)
            .run(&printer)
            .unwrap();

        assert!(results.cancelled);
        assert_eq!(results.stats.files_found, 1);
    }

    #[test]
    fn json_summary() {
        let results = Results {
            stats: Stats {
                files_found: 3,
                directories_found: 1,
                links_found: 0,
            },
            scan: ScanStats {
                entries: 10,
                duration: Duration::from_millis(5),
                entries_per_sec: 2000,
            },
            errors: 1,
            cancelled: false,
        };
        let value = json_complete(&results);
        assert_eq!(value["files_found"], 3);
        assert_eq!(value["errors"], 1);
        assert_eq!(value["cancelled"], false);
    }
}
