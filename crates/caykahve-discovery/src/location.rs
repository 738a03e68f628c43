//! Device location abstraction.

use std::time::Duration;

use async_trait::async_trait;
use caykahve_core::Location;
use thiserror::Error;

/// Why a device location could not be obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LocationError {
    #[error("location permission denied")]
    Denied,

    #[error("location unavailable")]
    Unavailable,

    #[error("location request timed out")]
    TimedOut,

    #[error("location services not supported")]
    Unsupported,
}

/// Coarse permission status, queried before asking for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
    /// Not known until a position is requested.
    Prompt,
}

/// A source of the user's current position.
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Requests a high-accuracy position.
    ///
    /// `timeout` is advisory; sources are not trusted to honour it, which is
    /// why [`crate::LocationResolver`] races its own timer.
    async fn current_position(&self, timeout: Duration) -> Result<Location, LocationError>;

    async fn permission(&self) -> PermissionState {
        PermissionState::Prompt
    }
}
