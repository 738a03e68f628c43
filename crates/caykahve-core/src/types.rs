//! Records shared by every stage of the discovery pipeline.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Discrete radius choices offered to the user, in metres.
pub const RADIUS_STEPS_METERS: [u32; 5] = [200, 500, 1000, 2000, 5000];

/// Label used when a remote record carries no name.
pub const DEFAULT_PLACE_NAME: &str = "Unnamed place";

/// A WGS84 coordinate pair. Immutable once produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LocationFields")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Unchecked wire form of [`Location`]; deserialization goes through
/// [`Location::new`].
#[derive(Deserialize)]
struct LocationFields {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<LocationFields> for Location {
    type Error = CoreError;

    fn try_from(fields: LocationFields) -> Result<Self, Self::Error> {
        Location::new(fields.latitude, fields.longitude)
    }
}

impl Location {
    /// Builds a location, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::CoordinateOutOfRange`] when latitude is outside
    /// `[-90, 90]` or longitude outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(CoreError::CoordinateOutOfRange {
                latitude: latitude.to_string(),
                longitude: longitude.to_string(),
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// The two venue categories a user can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Coffee venues.
    Primary,
    /// Tea venues.
    Secondary,
}

impl Category {
    /// Search term sent to the proxy.
    #[must_use]
    pub fn query_term(self) -> &'static str {
        match self {
            Category::Primary => "coffee",
            Category::Secondary => "tea",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.query_term())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "coffee" | "primary" => Ok(Category::Primary),
            "tea" | "secondary" => Ok(Category::Secondary),
            other => Err(CoreError::UnknownCategory(other.to_string())),
        }
    }
}

/// Look up a radius from [`RADIUS_STEPS_METERS`] by slider position.
///
/// # Errors
///
/// Returns [`CoreError::RadiusStepOutOfRange`] for an index past the table.
pub fn radius_from_step(index: usize) -> Result<u32, CoreError> {
    RADIUS_STEPS_METERS
        .get(index)
        .copied()
        .ok_or(CoreError::RadiusStepOutOfRange {
            index,
            len: RADIUS_STEPS_METERS.len(),
        })
}

/// One user-initiated search. Built fresh per discovery attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchQuery {
    pub category: Category,
    /// `None` lets the backend apply its own default radius.
    pub radius_meters: Option<u32>,
    pub origin: Location,
}

impl SearchQuery {
    #[must_use]
    pub fn new(category: Category, radius_meters: Option<u32>, origin: Location) -> Self {
        Self {
            category,
            radius_meters,
            origin,
        }
    }
}

/// A venue normalized from either remote record shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Remote identifier. Empty when the backend supplied none.
    pub id: String,
    pub name: String,
    pub coordinates: Location,
    /// Rating on a `0..=10` scale.
    pub rating: Option<f64>,
    pub distance_meters: Option<f64>,
    pub closed: Option<bool>,
}

/// A [`Place`] with the composite score computed by [`crate::rank`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedPlace {
    #[serde(flatten)]
    pub place: Place,
    pub score: f64,
}
