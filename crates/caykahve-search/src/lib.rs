//! Client for the places-search proxy.
//!
//! Sends one category- and radius-scoped query per discovery attempt and
//! normalizes either response envelope (`results` from the rated backend,
//! `elements` from the tag-based backend) into [`caykahve_core::Place`]
//! records.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{Backend, PlaceSearch, SearchClient, SearchResults};
pub use error::SearchError;
pub use normalize::{normalize_rated, normalize_unrated};
pub use types::{RatedPlace, SearchRequest, UnratedPlace};
