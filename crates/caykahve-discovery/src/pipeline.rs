//! The discovery pipeline: resolve → search → dedupe → rank → select → render.
//!
//! [`Discovery::discover`] is the single entry point per user action. It owns
//! the failure policy for the whole chain: nothing it calls can make it
//! return an error.

use std::sync::Arc;

use caykahve_core::{
    dedupe, rank, BusyGuard, BusyIndicator, Category, Location, Notification, Notifier,
    ResultSet, SearchQuery,
};
use caykahve_search::PlaceSearch;
use tokio::sync::Mutex;

use crate::display::{DisplayState, Renderer};
use crate::location::LocationSource;
use crate::resolver::LocationResolver;

/// What one discovery attempt produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Discovered {
    pub location: Location,
    pub results: ResultSet,
}

pub struct Discovery {
    resolver: LocationResolver,
    source: Arc<dyn LocationSource>,
    search: Arc<dyn PlaceSearch>,
    renderer: Arc<dyn Renderer>,
    notifier: Arc<dyn Notifier>,
    busy: Arc<dyn BusyIndicator>,
    max_results: usize,
    /// Serializes overlapping attempts; a second trigger waits its turn.
    in_flight: Mutex<()>,
}

impl Discovery {
    #[must_use]
    pub fn new(
        resolver: LocationResolver,
        source: Arc<dyn LocationSource>,
        search: Arc<dyn PlaceSearch>,
        renderer: Arc<dyn Renderer>,
        notifier: Arc<dyn Notifier>,
        busy: Arc<dyn BusyIndicator>,
        max_results: usize,
    ) -> Self {
        Self {
            resolver,
            source,
            search,
            renderer,
            notifier,
            busy,
            max_results,
            in_flight: Mutex::new(()),
        }
    }

    /// Run one discovery attempt and render its outcome.
    ///
    /// On a search failure the error message is posted to the notifier and
    /// the fallback location is shown with no places. An empty (successful)
    /// search posts an informational notice and centres on the resolved
    /// location.
    pub async fn discover(&self, category: Category, radius_meters: Option<u32>) -> Discovered {
        let _turn = self.in_flight.lock().await;
        let _busy = BusyGuard::new(self.busy.as_ref());

        let resolution = self.resolver.resolve(self.source.as_ref()).await;
        let query = SearchQuery::new(category, radius_meters, resolution.location);

        let discovered = match self.search.search(&query).await {
            Ok(found) => {
                let places = if found.backend.needs_dedupe() {
                    dedupe(found.places)
                } else {
                    found.places
                };
                let results = if found.backend.supports_ranking() {
                    ResultSet::ranked(rank(places), self.max_results)
                } else {
                    ResultSet::unranked(places, self.max_results)
                };

                if results.is_empty() {
                    tracing::info!(%category, location = %resolution.location, "no places found");
                    self.notifier
                        .notify(Notification::info("No suitable places found nearby."));
                } else {
                    tracing::info!(%category, count = results.len(), "places selected");
                }

                Discovered {
                    location: resolution.location,
                    results,
                }
            }
            Err(err) => {
                tracing::warn!(%category, error = %err, "place search failed");
                self.notifier.notify(Notification::error(&err));
                Discovered {
                    location: self.resolver.fallback(),
                    results: ResultSet::empty(),
                }
            }
        };

        let state = DisplayState::new(discovered.location, &discovered.results, radius_meters);
        self.renderer.render(&state);
        discovered
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
