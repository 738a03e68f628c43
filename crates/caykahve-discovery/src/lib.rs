//! Location-aware place discovery.
//!
//! Resolves a usable coordinate under slow or refused device location,
//! runs the search → dedupe → rank → select chain, and hands the result to a
//! [`Renderer`] as a fresh [`DisplayState`].

pub mod display;
pub mod location;
pub mod pipeline;
pub mod resolver;
pub mod sources;

pub use display::{directions_url, Bounds, DisplayState, Marker, OpenStatus, Renderer, View};
pub use location::{LocationError, LocationSource, PermissionState};
pub use pipeline::{Discovered, Discovery};
pub use resolver::{LocationResolver, Resolution, ResolveOutcome};
pub use sources::{GeoIpSource, StaticSource};
