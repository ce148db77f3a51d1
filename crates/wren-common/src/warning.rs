//! Renderer warnings with colored terminal output.
//!
//! Provides deduplication to avoid spamming the same warning multiple times,
//! and the [`DiagnosticSink`] seam that lets callers decide where recoverable
//! internal problems end up.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Warn about a recoverable problem (prints once per unique message)
///
/// # Example
/// ```ignore
/// warn_once("Layout", "style stack underflow while visiting <b>");
/// ```
pub fn warn_once(component: &str, message: &str) {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[Wren {component}] ⚠ {message}").yellow());
    }
}

/// Clear all recorded warnings (call when loading a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

/// Destination for diagnostics raised while recovering from internal
/// bookkeeping problems.
///
/// Layout never aborts on these; it reports them here and carries on.
pub trait DiagnosticSink {
    /// Report a diagnostic raised by `component`.
    fn warn(&mut self, component: &str, message: &str);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn warn(&mut self, component: &str, message: &str) {
        (**self).warn(component, message);
    }
}

/// Sink that forwards to [`warn_once`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalSink;

impl DiagnosticSink for TerminalSink {
    fn warn(&mut self, component: &str, message: &str) {
        warn_once(component, message);
    }
}

/// Sink that keeps every diagnostic in memory, formatted as
/// `[component] message`.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    /// Diagnostics in the order they were reported.
    pub messages: Vec<String>,
}

impl CollectingSink {
    /// Create an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn warn(&mut self, component: &str, message: &str) {
        self.messages.push(format!("[{component}] {message}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_sink_keeps_order() {
        let mut sink = CollectingSink::new();
        sink.warn("Layout", "first");
        sink.warn("HTML", "second");
        assert_eq!(sink.messages, vec!["[Layout] first", "[HTML] second"]);
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut sink = CollectingSink::new();
        {
            let mut borrowed = &mut sink;
            DiagnosticSink::warn(&mut borrowed, "Layout", "via reference");
        }
        assert_eq!(sink.messages.len(), 1);
    }

    #[test]
    fn warn_once_and_clear_do_not_panic() {
        warn_once("Test", "repeated message");
        warn_once("Test", "repeated message");
        clear_warnings();
        warn_once("Test", "repeated message");
    }
}
