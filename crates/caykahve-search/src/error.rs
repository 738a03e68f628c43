use thiserror::Error;

/// Errors returned by the search proxy client.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The proxy or the backend behind it reported a structured error.
    #[error("{message}")]
    Remote { message: String },

    /// Non-2xx status with no structured error body.
    #[error("unexpected HTTP status {status} from search proxy")]
    UnexpectedStatus { status: u16 },

    /// The response body could not be decoded.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid proxy URL '{url}': {reason}")]
    InvalidProxyUrl { url: String, reason: String },
}
