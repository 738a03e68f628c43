//! Hand-off to the rendering collaborator.
//!
//! Each discovery attempt builds one [`DisplayState`] from scratch and passes
//! it to a [`Renderer`] by reference. Nothing from a previous attempt is kept.

use caykahve_core::{Location, Place, ResultSet};
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenStatus {
    Open,
    LikelyClosed,
    Unknown,
}

impl OpenStatus {
    fn from_closed(closed: Option<bool>) -> Self {
        match closed {
            Some(true) => OpenStatus::LikelyClosed,
            Some(false) => OpenStatus::Open,
            None => OpenStatus::Unknown,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OpenStatus::Open => "open",
            OpenStatus::LikelyClosed => "likely closed",
            OpenStatus::Unknown => "unknown",
        }
    }
}

/// One numbered pin on the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// 1-based display position.
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub coordinates: Location,
    pub rating: Option<f64>,
    pub distance_meters: Option<f64>,
    pub status: OpenStatus,
    pub score: Option<f64>,
    pub directions_url: String,
}

impl Marker {
    fn new(rank: usize, place: &Place, score: Option<f64>) -> Self {
        Self {
            rank,
            id: place.id.clone(),
            name: place.name.clone(),
            coordinates: place.coordinates,
            rating: place.rating,
            distance_meters: place.distance_meters,
            status: OpenStatus::from_closed(place.closed),
            score,
            directions_url: directions_url(place.coordinates),
        }
    }

    /// `8.7 / 10`, or `N/A` for unrated venues.
    #[must_use]
    pub fn rating_text(&self) -> String {
        self.rating
            .map_or_else(|| "N/A".to_string(), |r| format!("{r:.1} / 10"))
    }

    #[must_use]
    pub fn distance_text(&self) -> Option<String> {
        self.distance_meters.map(|d| format!("{d:.0}m"))
    }
}

#[must_use]
pub fn directions_url(to: Location) -> String {
    format!(
        "https://www.google.com/maps?daddr={},{}",
        to.latitude, to.longitude
    )
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl Bounds {
    /// Smallest box containing every point. `None` for no points.
    #[must_use]
    pub fn covering(points: impl IntoIterator<Item = Location>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => Bounds {
                    south: p.latitude,
                    west: p.longitude,
                    north: p.latitude,
                    east: p.longitude,
                },
                Some(b) => Bounds {
                    south: b.south.min(p.latitude),
                    west: b.west.min(p.longitude),
                    north: b.north.max(p.latitude),
                    east: b.east.max(p.longitude),
                },
            })
        })
    }
}

/// How the view should be positioned.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum View {
    /// Centre on a single point (no places to show).
    Center { location: Location },
    /// Fit the user and every marker.
    Fit { bounds: Bounds },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayState {
    pub user_location: Location,
    pub markers: Vec<Marker>,
    /// Coverage circle to draw, when a radius was requested.
    pub radius_meters: Option<u32>,
    pub view: View,
}

impl DisplayState {
    #[must_use]
    pub fn new(user_location: Location, results: &ResultSet, radius_meters: Option<u32>) -> Self {
        let markers: Vec<Marker> = results
            .entries()
            .into_iter()
            .enumerate()
            .map(|(idx, (place, score))| Marker::new(idx + 1, place, score))
            .collect();

        let view = if markers.is_empty() {
            View::Center {
                location: user_location,
            }
        } else {
            let points = std::iter::once(user_location).chain(markers.iter().map(|m| m.coordinates));
            match Bounds::covering(points) {
                Some(bounds) => View::Fit { bounds },
                None => View::Center {
                    location: user_location,
                },
            }
        };

        Self {
            user_location,
            markers,
            radius_meters,
            view,
        }
    }

    /// GeoJSON `FeatureCollection`: the user first, then each marker.
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let mut features = vec![json!({
            "type": "Feature",
            "geometry": point(self.user_location),
            "properties": {
                "kind": "user",
                "radius_meters": self.radius_meters,
            }
        })];

        features.extend(self.markers.iter().map(|m| {
            json!({
                "type": "Feature",
                "geometry": point(m.coordinates),
                "properties": {
                    "kind": "place",
                    "rank": m.rank,
                    "id": m.id,
                    "name": m.name,
                    "rating": m.rating,
                    "distance_meters": m.distance_meters,
                    "status": m.status,
                    "score": m.score,
                    "directions_url": m.directions_url,
                }
            })
        }));

        json!({ "type": "FeatureCollection", "features": features })
    }
}

/// GeoJSON positions are `[lon, lat]`.
fn point(location: Location) -> Value {
    json!({
        "type": "Point",
        "coordinates": [location.longitude, location.latitude],
    })
}

/// Draws a [`DisplayState`].
pub trait Renderer: Send + Sync {
    fn render(&self, state: &DisplayState);
}

#[cfg(test)]
mod tests {
    use super::*;
    use caykahve_core::RankedPlace;

    fn loc(lat: f64, lon: f64) -> Location {
        Location::new(lat, lon).unwrap()
    }

    fn place(id: &str, at: Location, closed: Option<bool>) -> Place {
        Place {
            id: id.to_string(),
            name: format!("Place {id}"),
            coordinates: at,
            rating: Some(7.3),
            distance_meters: Some(412.4),
            closed,
        }
    }

    #[test]
    fn empty_results_center_on_user() {
        let user = loc(41.0, 29.0);
        let state = DisplayState::new(user, &ResultSet::empty(), None);
        assert!(state.markers.is_empty());
        assert_eq!(state.view, View::Center { location: user });
    }

    #[test]
    fn markers_are_numbered_and_bounds_cover_everything() {
        let user = loc(41.0, 29.0);
        let results = ResultSet::ranked(
            vec![
                RankedPlace {
                    place: place("a", loc(41.02, 28.95), Some(false)),
                    score: 0.9,
                },
                RankedPlace {
                    place: place("b", loc(40.98, 29.03), Some(true)),
                    score: 0.4,
                },
            ],
            10,
        );
        let state = DisplayState::new(user, &results, Some(1000));

        assert_eq!(state.markers[0].rank, 1);
        assert_eq!(state.markers[1].rank, 2);
        assert_eq!(state.markers[0].status, OpenStatus::Open);
        assert_eq!(state.markers[1].status, OpenStatus::LikelyClosed);
        assert_eq!(state.radius_meters, Some(1000));
        assert_eq!(
            state.view,
            View::Fit {
                bounds: Bounds {
                    south: 40.98,
                    west: 28.95,
                    north: 41.02,
                    east: 29.03
                }
            }
        );
    }

    #[test]
    fn marker_text_helpers() {
        let mut p = place("a", loc(1.0, 2.0), None);
        let marker = Marker::new(1, &p, None);
        assert_eq!(marker.rating_text(), "7.3 / 10");
        assert_eq!(marker.distance_text().as_deref(), Some("412m"));
        assert_eq!(marker.status, OpenStatus::Unknown);
        assert_eq!(
            marker.directions_url,
            "https://www.google.com/maps?daddr=1,2"
        );

        p.rating = None;
        assert_eq!(Marker::new(1, &p, None).rating_text(), "N/A");
    }

    #[test]
    fn geojson_lists_user_then_places() {
        let user = loc(41.0, 29.0);
        let results = ResultSet::unranked(vec![place("a", loc(41.01, 29.01), None)], 10);
        let geo = DisplayState::new(user, &results, None).to_geojson();

        assert_eq!(geo["type"], "FeatureCollection");
        let features = geo["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[0]["properties"]["kind"], "user");
        assert_eq!(features[1]["properties"]["rank"], 1);
        assert_eq!(features[1]["geometry"]["coordinates"][0], 29.01);
    }

    #[test]
    fn bounds_of_nothing_is_none() {
        assert!(Bounds::covering(std::iter::empty()).is_none());
    }
}
