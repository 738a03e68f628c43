//! Normalization from the two raw record shapes to [`Place`].

use caykahve_core::{Location, Place, DEFAULT_PLACE_NAME};

use crate::types::{RatedPlace, RawCoordinates, RawId, UnratedPlace};

const CLOSED_BUCKETS: &[&str] = &["LIKELY_CLOSED", "VERY_LIKELY_CLOSED"];

/// Normalizes a rated-backend record.
///
/// Returns `None` when the record has no usable coordinate.
#[must_use]
pub fn normalize_rated(raw: RatedPlace) -> Option<Place> {
    let id = id_string(raw.id.as_ref());
    let Some(coordinates) = resolve_coordinates(&raw.coordinates) else {
        tracing::warn!(id = %id, "dropping rated place without usable coordinates");
        return None;
    };

    Some(Place {
        name: display_name(raw.name.as_deref()),
        coordinates,
        rating: raw.rating.map(|r| clamp_rating(&id, r)),
        distance_meters: raw.distance.filter(|d| d.is_finite() && *d >= 0.0),
        closed: raw
            .closed_bucket
            .as_deref()
            .map(|bucket| CLOSED_BUCKETS.contains(&bucket)),
        id,
    })
}

/// Normalizes a tag-based-backend record.
///
/// Returns `None` when the record has no usable coordinate.
#[must_use]
pub fn normalize_unrated(raw: UnratedPlace) -> Option<Place> {
    let id = id_string(raw.id.as_ref());
    let Some(coordinates) = resolve_coordinates(&raw.coordinates) else {
        tracing::warn!(id = %id, "dropping tagged place without usable coordinates");
        return None;
    };

    Some(Place {
        name: display_name(
            raw.tags
                .get("name")
                .filter(|n| !n.trim().is_empty())
                .or_else(|| raw.tags.get("name:en"))
                .map(String::as_str),
        ),
        coordinates,
        rating: None,
        distance_meters: None,
        closed: None,
        id,
    })
}

fn id_string(id: Option<&RawId>) -> String {
    id.map(ToString::to_string).unwrap_or_default()
}

fn display_name(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(n) if !n.is_empty() => n.to_string(),
        _ => DEFAULT_PLACE_NAME.to_string(),
    }
}

fn clamp_rating(id: &str, rating: f64) -> f64 {
    if !(0.0..=10.0).contains(&rating) {
        tracing::warn!(id, rating, "rating outside 0..=10, clamping");
    }
    rating.clamp(0.0, 10.0)
}

fn resolve_coordinates(raw: &RawCoordinates) -> Option<Location> {
    let flat = raw.lat.zip(raw.lon);
    let center = raw.center.map(|c| (c.lat, c.lon));
    let geocode = raw
        .geocodes
        .as_ref()
        .and_then(|g| g.main)
        .map(|m| (m.latitude, m.longitude));

    [flat, center, geocode]
        .into_iter()
        .flatten()
        .find_map(|(lat, lon)| Location::new(lat, lon).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rated(value: serde_json::Value) -> RatedPlace {
        serde_json::from_value(value).expect("valid rated record")
    }

    fn unrated(value: serde_json::Value) -> UnratedPlace {
        serde_json::from_value(value).expect("valid unrated record")
    }

    #[test]
    fn rated_record_with_geocodes() {
        let place = normalize_rated(rated(json!({
            "fsq_id": "4b0588f",
            "name": "Kronotrop",
            "geocodes": { "main": { "latitude": 41.03, "longitude": 28.98 } },
            "rating": 8.7,
            "distance": 240,
            "closed_bucket": "VERY_LIKELY_OPEN"
        })))
        .unwrap();

        assert_eq!(place.id, "4b0588f");
        assert_eq!(place.name, "Kronotrop");
        assert!((place.coordinates.latitude - 41.03).abs() < 1e-9);
        assert_eq!(place.rating, Some(8.7));
        assert_eq!(place.distance_meters, Some(240.0));
        assert_eq!(place.closed, Some(false));
    }

    #[test]
    fn closed_buckets_map_to_closed() {
        for bucket in ["LIKELY_CLOSED", "VERY_LIKELY_CLOSED"] {
            let place = normalize_rated(rated(json!({
                "id": "a", "lat": 1.0, "lon": 2.0, "closed_bucket": bucket
            })))
            .unwrap();
            assert_eq!(place.closed, Some(true), "bucket {bucket}");
        }
    }

    #[test]
    fn missing_closure_signal_is_unknown() {
        let place = normalize_rated(rated(json!({ "id": "a", "lat": 1.0, "lon": 2.0 }))).unwrap();
        assert_eq!(place.closed, None);
        assert_eq!(place.rating, None);
    }

    #[test]
    fn flat_coordinates_win_over_center() {
        let place = normalize_unrated(unrated(json!({
            "id": 1,
            "lat": 10.0, "lon": 20.0,
            "center": { "lat": 30.0, "lon": 40.0 }
        })))
        .unwrap();
        assert!((place.coordinates.latitude - 10.0).abs() < 1e-9);
    }

    #[test]
    fn center_used_when_flat_missing() {
        let place = normalize_unrated(unrated(json!({
            "type": "way",
            "id": 987_654,
            "center": { "lat": 30.0, "lon": 40.0 },
            "tags": { "name": "Çaycı Ahmet", "amenity": "cafe" }
        })))
        .unwrap();
        assert_eq!(place.id, "987654");
        assert_eq!(place.name, "Çaycı Ahmet");
        assert!((place.coordinates.longitude - 40.0).abs() < 1e-9);
        assert_eq!(place.rating, None);
        assert_eq!(place.distance_meters, None);
    }

    #[test]
    fn partial_flat_pair_falls_through_to_center() {
        let place = normalize_unrated(unrated(json!({
            "id": 2,
            "lat": 10.0,
            "center": { "lat": 30.0, "lon": 40.0 }
        })))
        .unwrap();
        assert!((place.coordinates.latitude - 30.0).abs() < 1e-9);
    }

    #[test]
    fn record_without_coordinates_is_dropped() {
        assert!(normalize_unrated(unrated(json!({ "id": 3, "tags": {} }))).is_none());
    }

    #[test]
    fn missing_name_gets_default_label() {
        let place = normalize_unrated(unrated(json!({ "id": 4, "lat": 1.0, "lon": 1.0 }))).unwrap();
        assert_eq!(place.name, DEFAULT_PLACE_NAME);
        let place = normalize_rated(rated(json!({ "id": "b", "name": "  ", "lat": 1.0, "lon": 1.0 })))
            .unwrap();
        assert_eq!(place.name, DEFAULT_PLACE_NAME);
    }

    #[test]
    fn english_name_tag_used_when_name_missing() {
        let place = normalize_unrated(unrated(json!({
            "id": 5,
            "lat": 1.0,
            "lon": 1.0,
            "tags": { "name:en": "Tea Garden", "amenity": "cafe" }
        })))
        .unwrap();
        assert_eq!(place.name, "Tea Garden");

        let place = normalize_unrated(unrated(json!({
            "id": 6,
            "lat": 1.0,
            "lon": 1.0,
            "tags": { "name": "Çay Bahçesi", "name:en": "Tea Garden" }
        })))
        .unwrap();
        assert_eq!(place.name, "Çay Bahçesi");
    }

    #[test]
    fn missing_id_becomes_empty() {
        let place = normalize_rated(rated(json!({ "lat": 1.0, "lon": 1.0 }))).unwrap();
        assert!(place.id.is_empty());
    }

    #[test]
    fn out_of_range_rating_is_clamped() {
        let place =
            normalize_rated(rated(json!({ "id": "c", "lat": 1.0, "lon": 1.0, "rating": 11.5 })))
                .unwrap();
        assert_eq!(place.rating, Some(10.0));
    }

    #[test]
    fn negative_distance_is_discarded() {
        let place =
            normalize_rated(rated(json!({ "id": "d", "lat": 1.0, "lon": 1.0, "distance": -5 })))
                .unwrap();
        assert_eq!(place.distance_meters, None);
    }
}
