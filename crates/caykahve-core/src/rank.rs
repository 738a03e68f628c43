//! Composite quality/proximity ranking.
//!
//! `score = rating/10 * RATING_WEIGHT + (1 - distance/max_distance) * DISTANCE_WEIGHT`
//!
//! The weights sum to one, so for in-range inputs every score lies in
//! `[0.0, 1.0]`.

use crate::types::{Place, RankedPlace};

pub const RATING_WEIGHT: f64 = 0.4;
pub const DISTANCE_WEIGHT: f64 = 0.6;

/// Rating assumed for venues the backend has not rated.
const NEUTRAL_RATING: f64 = 5.0;
const RATING_SCALE: f64 = 10.0;

/// Lower bound on the batch maximum distance, so all-zero batches do not
/// divide by zero.
const MIN_MAX_DISTANCE: f64 = 1.0;

/// Score one place against the batch's maximum distance.
///
/// A missing rating normalizes to exactly `0.5`. A missing distance scores
/// like the farthest place in the batch; [`rank`] orders it after any known
/// distance with the same score.
#[must_use]
pub fn score_place(place: &Place, max_distance: f64) -> f64 {
    let normalized_rating = place.rating.unwrap_or(NEUTRAL_RATING) / RATING_SCALE;
    let distance = place.distance_meters.unwrap_or(max_distance);
    let normalized_distance = 1.0 - (distance / max_distance).min(1.0);

    normalized_rating * RATING_WEIGHT + normalized_distance * DISTANCE_WEIGHT
}

/// Score every place and order them best first.
///
/// The sort is stable: places with identical scores keep the order the
/// backend returned them in, except that an unknown distance goes last.
#[must_use]
pub fn rank(places: Vec<Place>) -> Vec<RankedPlace> {
    if places.is_empty() {
        return Vec::new();
    }

    let max_distance = places
        .iter()
        .filter_map(|p| p.distance_meters)
        .fold(MIN_MAX_DISTANCE, f64::max);

    let mut ranked: Vec<RankedPlace> = places
        .into_iter()
        .map(|place| {
            let score = score_place(&place, max_distance);
            RankedPlace { place, score }
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.score.total_cmp(&a.score).then_with(|| {
            a.place
                .distance_meters
                .is_none()
                .cmp(&b.place.distance_meters.is_none())
        })
    });

    tracing::debug!(count = ranked.len(), max_distance, "ranked places");
    ranked
}
