//! Wire types for the search proxy.
//!
//! The proxy fronts one of two backends. The rated backend answers
//! `{ "results": [...] }` with ratings, distances, and closure hints; the
//! tag-based backend answers `{ "elements": [...] }` with free-form tags.
//! Either may instead answer `{ "error": true, "message": "..." }`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// JSON body POSTed to the proxy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    pub lat: f64,
    pub lon: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<u32>,
}

/// Identifier that may arrive as a string or a number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(u64),
}

impl std::fmt::Display for RawId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawId::Text(s) => f.write_str(s),
            RawId::Number(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeocodePoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Geocodes {
    #[serde(default)]
    pub main: Option<GeocodePoint>,
}

/// Every coordinate shape a record may carry.
///
/// Resolved in order: flat `lat`/`lon`, `center`, `geocodes.main`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawCoordinates {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub center: Option<LatLon>,
    #[serde(default)]
    pub geocodes: Option<Geocodes>,
}

/// Record from the rated backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatedPlace {
    #[serde(default, alias = "fsq_id")]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    /// `0..=10` when present.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub distance: Option<f64>,
    /// e.g. `VERY_LIKELY_OPEN`, `LIKELY_CLOSED`.
    #[serde(default)]
    pub closed_bucket: Option<String>,
}

/// Record from the tag-based backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UnratedPlace {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(flatten)]
    pub coordinates: RawCoordinates,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}
