//! Turns uncertain device location into a single usable coordinate.
//!
//! `Idle → Requesting → {Resolved, TimedOut, Denied, Unavailable, Unsupported}`.
//! Every non-`Resolved` outcome settles on the configured fallback location
//! and posts a notification naming the path taken.

use std::sync::Arc;
use std::time::Duration;

use caykahve_core::{Location, Notification, Notifier};

use crate::location::{LocationError, LocationSource, PermissionState};

/// How a resolution settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    Resolved,
    Fallback(LocationError),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub location: Location,
    pub outcome: ResolveOutcome,
}

impl Resolution {
    #[must_use]
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ResolveOutcome::Fallback(_))
    }
}

pub struct LocationResolver {
    fallback: Location,
    /// Backstop timer. `None` relies on the source's own timeout.
    deadline: Option<Duration>,
    device_timeout: Duration,
    /// Query the coarse permission first and skip the device on `Denied`.
    probe_permission: bool,
    notifier: Arc<dyn Notifier>,
}

impl LocationResolver {
    #[must_use]
    pub fn new(fallback: Location, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            fallback,
            deadline: Some(Duration::from_secs(6)),
            device_timeout: Duration::from_secs(5),
            probe_permission: false,
            notifier,
        }
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    #[must_use]
    pub fn with_device_timeout(mut self, timeout: Duration) -> Self {
        self.device_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_permission_probe(mut self, probe: bool) -> Self {
        self.probe_permission = probe;
        self
    }

    #[must_use]
    pub fn fallback(&self) -> Location {
        self.fallback
    }

    /// Resolve a location. Never fails and never waits past the deadline.
    ///
    /// The deadline covers the permission probe as well as the device
    /// request.
    pub async fn resolve(&self, source: &dyn LocationSource) -> Resolution {
        let attempt = async {
            if self.probe_permission && source.permission().await == PermissionState::Denied {
                tracing::info!("location permission already denied, skipping device request");
                return Err(LocationError::Denied);
            }
            source.current_position(self.device_timeout).await
        };

        let settled = match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    result = attempt => result,
                    () = tokio::time::sleep(deadline) => {
                        tracing::debug!(?deadline, "location timer fired before device settled");
                        Err(LocationError::TimedOut)
                    }
                }
            }
            None => attempt.await,
        };

        match settled {
            Ok(location) => {
                tracing::debug!(%location, "device location resolved");
                Resolution {
                    location,
                    outcome: ResolveOutcome::Resolved,
                }
            }
            Err(reason) => self.fall_back(reason),
        }
    }

    fn fall_back(&self, reason: LocationError) -> Resolution {
        tracing::info!(%reason, fallback = %self.fallback, "using fallback location");
        self.notifier.notify(fallback_notification(reason));
        Resolution {
            location: self.fallback,
            outcome: ResolveOutcome::Fallback(reason),
        }
    }
}

fn fallback_notification(reason: LocationError) -> Notification {
    match reason {
        LocationError::Denied => {
            Notification::error("location permission denied, using the default location")
        }
        LocationError::Unavailable => {
            Notification::error("location information unavailable, using the default location")
        }
        LocationError::TimedOut => {
            Notification::info("Could not get your location in time, using the default location.")
        }
        LocationError::Unsupported => {
            Notification::info("Location services are not supported, using the default location.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::StaticSource;
    use caykahve_core::LatestNotification;

    fn fallback() -> Location {
        Location::new(41.015_137, 28.979_53).unwrap()
    }

    fn device() -> Location {
        Location::new(39.925_533, 32.866_287).unwrap()
    }

    fn resolver(notes: &Arc<LatestNotification>) -> LocationResolver {
        LocationResolver::new(fallback(), notes.clone())
            .with_deadline(Some(Duration::from_secs(6)))
            .with_device_timeout(Duration::from_secs(5))
    }

    #[tokio::test(start_paused = true)]
    async fn prompt_device_location_wins() {
        let notes = Arc::new(LatestNotification::new());
        let source = StaticSource::at(device()).with_delay(Duration::from_secs(1));
        let res = resolver(&notes).resolve(&source).await;
        assert_eq!(res.outcome, ResolveOutcome::Resolved);
        assert_eq!(res.location, device());
        assert!(notes.latest().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_device_loses_to_timer() {
        let notes = Arc::new(LatestNotification::new());
        let source = StaticSource::at(device()).with_delay(Duration::from_secs(60));
        let started = tokio::time::Instant::now();
        let res = resolver(&notes).resolve(&source).await;

        assert_eq!(res.outcome, ResolveOutcome::Fallback(LocationError::TimedOut));
        assert_eq!(res.location, fallback());
        let waited = started.elapsed();
        assert!(
            waited >= Duration::from_secs(6) && waited < Duration::from_secs(7),
            "resolver waited {waited:?}"
        );
        let note = notes.latest().unwrap();
        assert!(!note.is_error());
    }

    #[tokio::test(start_paused = true)]
    async fn device_error_falls_back_with_error_notice() {
        let notes = Arc::new(LatestNotification::new());
        let source = StaticSource::failing(LocationError::Unavailable);
        let res = resolver(&notes).resolve(&source).await;
        assert_eq!(
            res.outcome,
            ResolveOutcome::Fallback(LocationError::Unavailable)
        );
        assert!(res.is_fallback());
        assert!(notes.latest().unwrap().is_error());
    }

    #[tokio::test]
    async fn denied_permission_short_circuits() {
        let notes = Arc::new(LatestNotification::new());
        // Delay would hang the test if the device were consulted.
        let source = StaticSource::denied().with_delay(Duration::from_secs(3600));
        let res = resolver(&notes)
            .with_deadline(None)
            .with_permission_probe(true)
            .resolve(&source)
            .await;
        assert_eq!(res.outcome, ResolveOutcome::Fallback(LocationError::Denied));
        assert_eq!(res.location, fallback());
        assert!(notes.latest().unwrap().message.contains("permission denied"));
    }

    /// Permission query that never answers in time.
    struct StalledPermission;

    #[async_trait::async_trait]
    impl LocationSource for StalledPermission {
        async fn current_position(&self, _timeout: Duration) -> Result<Location, LocationError> {
            Ok(device())
        }

        async fn permission(&self) -> PermissionState {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            PermissionState::Granted
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_permission_query_respects_deadline() {
        let notes = Arc::new(LatestNotification::new());
        let started = tokio::time::Instant::now();
        let res = resolver(&notes)
            .with_permission_probe(true)
            .resolve(&StalledPermission)
            .await;

        let waited = started.elapsed();
        assert!(
            waited >= Duration::from_secs(6) && waited < Duration::from_secs(7),
            "resolver waited {waited:?}"
        );
        assert_eq!(res.outcome, ResolveOutcome::Fallback(LocationError::TimedOut));
        assert_eq!(res.location, fallback());
    }

    #[tokio::test(start_paused = true)]
    async fn without_deadline_waits_for_device() {
        let notes = Arc::new(LatestNotification::new());
        let source = StaticSource::at(device()).with_delay(Duration::from_secs(30));
        let res = resolver(&notes).with_deadline(None).resolve(&source).await;
        assert_eq!(res.location, device());
    }

    #[tokio::test]
    async fn unsupported_falls_back() {
        let notes = Arc::new(LatestNotification::new());
        let source = StaticSource::failing(LocationError::Unsupported);
        let res = resolver(&notes).resolve(&source).await;
        assert_eq!(
            res.outcome,
            ResolveOutcome::Fallback(LocationError::Unsupported)
        );
    }
}
