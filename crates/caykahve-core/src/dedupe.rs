//! Stable removal of repeated place records.

use std::collections::HashSet;

use crate::types::Place;

/// Drop later records whose `id` was already seen, keeping first-seen order.
///
/// Records with an empty `id` are never considered duplicates of one another:
/// each one is kept.
#[must_use]
pub fn dedupe(places: Vec<Place>) -> Vec<Place> {
    let mut seen: HashSet<String> = HashSet::with_capacity(places.len());
    let before = places.len();

    let kept: Vec<Place> = places
        .into_iter()
        .filter(|place| place.id.is_empty() || seen.insert(place.id.clone()))
        .collect();

    if kept.len() != before {
        tracing::debug!(
            before,
            after = kept.len(),
            "dropped duplicate place records"
        );
    }
    kept
}
