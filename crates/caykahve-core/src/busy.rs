//! Caller-visible "work in progress" indicator.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Receives busy/idle transitions from the pipeline.
///
/// Calls nest: every `begin` is matched by exactly one `end`, so an
/// implementation should stay busy until the outermost `end`.
pub trait BusyIndicator: Send + Sync {
    fn begin(&self);
    fn end(&self);
}

/// Marks `indicator` busy for as long as the guard lives.
///
/// Dropping the guard clears the mark on every exit path, including `?`
/// early returns and unwinding.
#[must_use = "the indicator is cleared as soon as the guard is dropped"]
pub struct BusyGuard<'a> {
    indicator: &'a dyn BusyIndicator,
}

impl<'a> BusyGuard<'a> {
    pub fn new(indicator: &'a dyn BusyIndicator) -> Self {
        indicator.begin();
        Self { indicator }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.indicator.end();
    }
}

/// Nesting-aware busy counter.
#[derive(Debug, Default)]
pub struct BusyFlag {
    depth: AtomicUsize,
}

impl BusyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.depth.load(Ordering::SeqCst) > 0
    }
}

impl BusyIndicator for BusyFlag {
    fn begin(&self) {
        self.depth.fetch_add(1, Ordering::SeqCst);
    }

    fn end(&self) {
        // Saturate instead of wrapping if a caller ends more than it began.
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
    }
}

/// Indicator that ignores every transition.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoBusyIndicator;

impl BusyIndicator for NoBusyIndicator {
    fn begin(&self) {}
    fn end(&self) {}
}
