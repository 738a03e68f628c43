//! Domain model and pure pipeline stages for caykahve.
//!
//! Holds the place records shared by every crate, the environment-driven
//! configuration, and the I/O-free stages of the discovery pipeline:
//! deduplication, ranking, and result-window selection.

pub mod app_config;
pub mod busy;
pub mod config;
pub mod dedupe;
pub mod notify;
pub mod rank;
pub mod select;
pub mod types;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use busy::{BusyFlag, BusyGuard, BusyIndicator, NoBusyIndicator};
pub use config::{load_app_config, load_app_config_from_env};
pub use dedupe::dedupe;
pub use notify::{LatestNotification, Notification, NotificationKind, Notifier};
pub use rank::{rank, score_place, DISTANCE_WEIGHT, RATING_WEIGHT};
pub use select::{select, ResultSet};
pub use types::{
    radius_from_step, Category, Location, Place, RankedPlace, SearchQuery, DEFAULT_PLACE_NAME,
    RADIUS_STEPS_METERS,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("radius step {index} out of range (0..{len})")]
    RadiusStepOutOfRange { index: usize, len: usize },

    #[error("coordinate out of range: lat={latitude}, lon={longitude}")]
    CoordinateOutOfRange { latitude: String, longitude: String },
}
