//! HTTP client for the places-search proxy.
//!
//! One POST per discovery attempt, no retries. The proxy decides which
//! concrete places provider answers; this client only cares about the two
//! response envelopes it may return.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use caykahve_core::{BusyGuard, BusyIndicator, NoBusyIndicator, Place, SearchQuery};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::SearchError;
use crate::normalize::{normalize_rated, normalize_unrated};
use crate::types::{RatedPlace, SearchRequest, UnratedPlace};

/// Which backend shape produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// `results` envelope: ratings and distances are available.
    Rated,
    /// `elements` envelope: tag-based records, may repeat a venue.
    Unrated,
}

impl Backend {
    /// Whether records from this backend can be ranked.
    #[must_use]
    pub fn supports_ranking(self) -> bool {
        matches!(self, Backend::Rated)
    }

    /// Whether this backend can return the same venue more than once.
    #[must_use]
    pub fn needs_dedupe(self) -> bool {
        matches!(self, Backend::Unrated)
    }
}

/// Normalized places plus the backend they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResults {
    pub backend: Backend,
    pub places: Vec<Place>,
}

/// Anything that can answer a [`SearchQuery`].
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError>;
}

/// Client for the search proxy.
///
/// Use [`SearchClient::new`] with the configured proxy URL; in tests point it
/// at a wiremock server instead.
pub struct SearchClient {
    client: Client,
    proxy_url: Url,
    busy: Arc<dyn BusyIndicator>,
}

impl SearchClient {
    /// Creates a client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidProxyUrl`] if `proxy_url` does not parse
    /// or is not http(s), and [`SearchError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(proxy_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, SearchError> {
        let parsed = Url::parse(proxy_url).map_err(|e| SearchError::InvalidProxyUrl {
            url: proxy_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(SearchError::InvalidProxyUrl {
                url: proxy_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            proxy_url: parsed,
            busy: Arc::new(NoBusyIndicator),
        })
    }

    /// Report in-flight requests to `busy`.
    #[must_use]
    pub fn with_busy_indicator(mut self, busy: Arc<dyn BusyIndicator>) -> Self {
        self.busy = busy;
        self
    }

    /// Sends the query and normalizes the response.
    ///
    /// A response with neither `results` nor `elements` yields an empty list.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Remote`] if the body carries an error flag or message.
    /// - [`SearchError::UnexpectedStatus`] on a non-2xx status without one.
    /// - [`SearchError::Http`] on network failure or timeout.
    /// - [`SearchError::Deserialize`] if the body is not JSON.
    pub async fn search_places(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        let _busy = BusyGuard::new(self.busy.as_ref());

        let request = build_request(query);
        tracing::debug!(
            category = %query.category,
            radius = ?query.radius_meters,
            origin = %query.origin,
            "sending place search"
        );

        let response = self
            .client
            .post(self.proxy_url.clone())
            .json(&request)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| remote_error_message(&body));
            return Err(match message {
                Some(message) => SearchError::Remote { message },
                None => SearchError::UnexpectedStatus {
                    status: status.as_u16(),
                },
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| SearchError::Deserialize {
            context: "search response".to_string(),
            source: e,
        })?;

        if let Some(message) = remote_error_message(&body) {
            return Err(SearchError::Remote { message });
        }

        let results = parse_envelope(body);
        tracing::info!(
            backend = ?results.backend,
            count = results.places.len(),
            "place search completed"
        );
        Ok(results)
    }
}

#[async_trait]
impl PlaceSearch for SearchClient {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError> {
        self.search_places(query).await
    }
}

fn build_request(query: &SearchQuery) -> SearchRequest {
    SearchRequest {
        lat: query.origin.latitude,
        lon: query.origin.longitude,
        query: Some(query.category.query_term().to_string()),
        radius: query.radius_meters,
    }
}

/// Extracts the message from `{ "error": true, "message": ... }`.
///
/// A string-valued `error` is accepted as its own message; a bare `message`
/// with no `results`/`elements` list is treated as an error too.
fn remote_error_message(body: &Value) -> Option<String> {
    let message = body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string);

    match body.get("error") {
        Some(Value::Bool(true)) => Some(message.unwrap_or_else(|| "unknown error".to_string())),
        Some(Value::String(s)) if !s.is_empty() => Some(message.unwrap_or_else(|| s.clone())),
        Some(Value::Object(obj)) => Some(
            obj.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .or(message)
                .unwrap_or_else(|| "unknown error".to_string()),
        ),
        _ if body.get("results").is_none() && body.get("elements").is_none() => message,
        _ => None,
    }
}

/// Picks the result list out of either envelope, skipping records that do
/// not deserialize or normalize.
fn parse_envelope(mut body: Value) -> SearchResults {
    if let Some(results) = body.get_mut("results").map(Value::take) {
        let places = records(results, "results")
            .filter_map(|v| decode::<RatedPlace>(v, "results"))
            .filter_map(normalize_rated)
            .collect();
        return SearchResults {
            backend: Backend::Rated,
            places,
        };
    }

    if let Some(elements) = body.get_mut("elements").map(Value::take) {
        let places = records(elements, "elements")
            .filter_map(|v| decode::<UnratedPlace>(v, "elements"))
            .filter_map(normalize_unrated)
            .collect();
        return SearchResults {
            backend: Backend::Unrated,
            places,
        };
    }

    tracing::debug!("search response carried no result list");
    SearchResults {
        backend: Backend::Unrated,
        places: Vec::new(),
    }
}

fn records(list: Value, key: &'static str) -> impl Iterator<Item = Value> {
    let items = match list {
        Value::Array(items) => items,
        Value::Null => Vec::new(),
        other => {
            tracing::warn!(key, kind = %json_kind(&other), "result list is not an array");
            Vec::new()
        }
    };
    items.into_iter()
}

fn decode<T: DeserializeOwned>(value: Value, key: &'static str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(key, error = %e, "skipping undecodable record");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
