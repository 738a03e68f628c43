//! Terminal implementations of the display, notification, and busy seams.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use caykahve_core::{BusyIndicator, Notification, Notifier};
use caykahve_discovery::{DisplayState, Renderer, View};

use crate::OutputFormat;

pub(crate) struct TerminalRenderer {
    format: OutputFormat,
}

impl TerminalRenderer {
    pub(crate) fn new(format: OutputFormat) -> Self {
        Self { format }
    }
}

impl Renderer for TerminalRenderer {
    fn render(&self, state: &DisplayState) {
        let out = match self.format {
            OutputFormat::Text => render_text(state),
            OutputFormat::Json => match serde_json::to_string_pretty(&state.to_geojson()) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!(error = %e, "failed to encode GeoJSON");
                    return;
                }
            },
        };
        let mut stdout = std::io::stdout().lock();
        if let Err(e) = writeln!(stdout, "{out}") {
            tracing::warn!(error = %e, "failed to write results");
        }
    }
}

pub(crate) fn render_text(state: &DisplayState) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = write!(out, "You are here: {}", state.user_location);
    if let Some(radius) = state.radius_meters {
        let _ = write!(out, " (radius {radius}m)");
    }
    out.push('\n');

    if let View::Fit { bounds } = state.view {
        let _ = writeln!(
            out,
            "View: {:.5},{:.5} to {:.5},{:.5}",
            bounds.south, bounds.west, bounds.north, bounds.east
        );
    }

    for marker in &state.markers {
        let _ = writeln!(out, "\n{}. {}", marker.rank, marker.name);
        let _ = writeln!(out, "   status:   {}", marker.status.label());
        let _ = writeln!(out, "   rating:   {}", marker.rating_text());
        if let Some(distance) = marker.distance_text() {
            let _ = writeln!(out, "   distance: {distance}");
        }
        let _ = writeln!(out, "   directions: {}", marker.directions_url);
    }
    out
}

/// Prints notifications to stderr, one line each.
pub(crate) struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notification: Notification) {
        if notification.is_error() {
            eprintln!("✖ {}", notification.message);
        } else {
            eprintln!("• {}", notification.message);
        }
    }
}

/// Prints a progress line when work starts.
#[derive(Default)]
pub(crate) struct TerminalBusy {
    depth: AtomicUsize,
}

impl BusyIndicator for TerminalBusy {
    fn begin(&self) {
        if self.depth.fetch_add(1, Ordering::SeqCst) == 0 {
            eprintln!("… searching");
        }
    }

    fn end(&self) {
        let _ = self
            .depth
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |d| d.checked_sub(1));
    }
}
