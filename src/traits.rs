use std::sync::{Arc, Mutex};

use crate::event::{ErrorEvent, MatchEvent};
use crate::results::Stats;

/// Receives search events as they happen.
///
/// Implement this to render results incrementally: a terminal printer, a UI
/// list, a channel to another thread, or a test collector.
///
/// # Thread Safety
///
/// `Send + Sync` are required. In parallel mode the walker calls the sink
/// from several worker threads at once, so implementations that record state
/// need interior mutability (a `Mutex`, a channel sender, atomics).
///
/// # Ordering
///
/// With one thread, events arrive in depth-first pre-order with siblings
/// sorted by name. With more threads the order is unspecified.
///
/// No method is ever called after the search returns.
///
/// # Example
///
/// ```rust
/// use dirsift::{EventSink, MatchEvent};
///
/// struct Printer;
///
/// impl EventSink for Printer {
///     fn on_match(&self, event: &MatchEvent) {
///         println!("{}", event.display_path().display());
///     }
/// }
/// ```
pub trait EventSink: Send + Sync {
    /// Called once per matching entry.
    fn on_match(&self, event: &MatchEvent);

    /// Called once per directory that could not be listed.
    fn on_error(&self, _event: &ErrorEvent) {}

    /// Called after every match with the running counts.
    fn on_progress(&self, _stats: &Stats) {}
}

impl<S: EventSink + ?Sized> EventSink for &S {
    fn on_match(&self, event: &MatchEvent) {
        (**self).on_match(event)
    }

    fn on_error(&self, event: &ErrorEvent) {
        (**self).on_error(event)
    }

    fn on_progress(&self, stats: &Stats) {
        (**self).on_progress(stats)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    fn on_match(&self, event: &MatchEvent) {
        (**self).on_match(event)
    }

    fn on_error(&self, event: &ErrorEvent) {
        (**self).on_error(event)
    }

    fn on_progress(&self, stats: &Stats) {
        (**self).on_progress(stats)
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    fn on_match(&self, event: &MatchEvent) {
        (**self).on_match(event)
    }

    fn on_error(&self, event: &ErrorEvent) {
        (**self).on_error(event)
    }

    fn on_progress(&self, stats: &Stats) {
        (**self).on_progress(stats)
    }
}

/// Discards every event. Useful when only the final counts matter.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn on_match(&self, _event: &MatchEvent) {}
}

/// Records every event in arrival order.
#[derive(Debug, Default)]
pub struct Collector {
    matches: Mutex<Vec<MatchEvent>>,
    errors: Mutex<Vec<ErrorEvent>>,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Match events received so far.
    pub fn matches(&self) -> Vec<MatchEvent> {
        self.matches.lock().map(|m| m.clone()).unwrap_or_default()
    }

    /// Error events received so far.
    pub fn errors(&self) -> Vec<ErrorEvent> {
        self.errors.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Consume the collector, returning `(matches, errors)`.
    pub fn into_parts(self) -> (Vec<MatchEvent>, Vec<ErrorEvent>) {
        (
            self.matches.into_inner().unwrap_or_default(),
            self.errors.into_inner().unwrap_or_default(),
        )
    }
}

impl EventSink for Collector {
    fn on_match(&self, event: &MatchEvent) {
        if let Ok(mut m) = self.matches.lock() {
            m.push(event.clone());
        }
    }

    fn on_error(&self, event: &ErrorEvent) {
        if let Ok(mut e) = self.errors.lock() {
            e.push(event.clone());
        }
    }
}
