//! Concrete [`LocationSource`] implementations.

use std::time::Duration;

use async_trait::async_trait;
use caykahve_core::Location;
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::location::{LocationError, LocationSource, PermissionState};

/// A source with a predetermined answer.
///
/// Backs the CLI's `--lat/--lon` and `--no-location` flags, and stands in for
/// slow or failing devices via [`StaticSource::with_delay`].
#[derive(Debug, Clone)]
pub struct StaticSource {
    position: Result<Location, LocationError>,
    permission: PermissionState,
    delay: Option<Duration>,
}

impl StaticSource {
    #[must_use]
    pub fn at(location: Location) -> Self {
        Self {
            position: Ok(location),
            permission: PermissionState::Granted,
            delay: None,
        }
    }

    #[must_use]
    pub fn failing(error: LocationError) -> Self {
        Self {
            position: Err(error),
            permission: PermissionState::Prompt,
            delay: None,
        }
    }

    /// Permission already refused; never yields a position.
    #[must_use]
    pub fn denied() -> Self {
        Self {
            position: Err(LocationError::Denied),
            permission: PermissionState::Denied,
            delay: None,
        }
    }

    /// Settle only after `delay` has elapsed.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl LocationSource for StaticSource {
    async fn current_position(&self, _timeout: Duration) -> Result<Location, LocationError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.position
    }

    async fn permission(&self) -> PermissionState {
        self.permission
    }
}

/// Approximate position from an IP geolocation endpoint.
///
/// Accepts `{ "lat", "lon" }` or `{ "latitude", "longitude" }` bodies; a
/// `"status": "fail"` body or missing coordinates map to
/// [`LocationError::Unavailable`].
pub struct GeoIpSource {
    client: Client,
    url: String,
}

impl GeoIpSource {
    /// # Errors
    ///
    /// Returns the `reqwest` error if the HTTP client cannot be built.
    pub fn new(url: &str, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    async fn fetch(&self, timeout: Duration) -> Result<Location, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport)?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(LocationError::Denied),
            s if !s.is_success() => {
                tracing::debug!(status = s.as_u16(), "geoip lookup failed");
                return Err(LocationError::Unavailable);
            }
            _ => {}
        }

        let body: Value = response.json().await.map_err(classify_transport)?;
        parse_position(&body)
    }
}

#[async_trait]
impl LocationSource for GeoIpSource {
    async fn current_position(&self, timeout: Duration) -> Result<Location, LocationError> {
        self.fetch(timeout).await
    }

    async fn permission(&self) -> PermissionState {
        PermissionState::Granted
    }
}

fn classify_transport(err: reqwest::Error) -> LocationError {
    if err.is_timeout() {
        LocationError::TimedOut
    } else {
        tracing::debug!(error = %err, "geoip request failed");
        LocationError::Unavailable
    }
}

fn parse_position(body: &Value) -> Result<Location, LocationError> {
    if body.get("status").and_then(Value::as_str) == Some("fail") {
        return Err(LocationError::Unavailable);
    }

    let coord = |short: &str, long: &str| {
        body.get(short)
            .or_else(|| body.get(long))
            .and_then(Value::as_f64)
    };

    let (Some(lat), Some(lon)) = (coord("lat", "latitude"), coord("lon", "longitude")) else {
        return Err(LocationError::Unavailable);
    };
    Location::new(lat, lon).map_err(|_| LocationError::Unavailable)
}
