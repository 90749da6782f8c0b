use reqwest::StatusCode;
use thiserror::Error;

/// Errors produced by request operations.
///
/// The request pipeline maps every failure into one of these variants;
/// `InvalidAccessKey` can only occur while constructing a [`Client`].
///
/// [`Client`]: crate::Client
#[derive(Debug, Error)]
pub enum RequestError {
    /// The response status fell outside both the success (200..=298) and
    /// failure (400..=498) ranges.
    #[error("invalid URL")]
    InvalidUrl,

    /// The exchange produced no HTTP response to classify.
    #[error("not a HTTP response")]
    NoHttpResponse,

    /// The server answered with a status in the failure range, or with a
    /// success status but no body.
    #[error("HTTP error: {0}")]
    Http(StatusCode),

    /// The transport reported that no network connectivity is available.
    #[error("not connected to internet")]
    NotConnectedToInternet,

    /// A transport or decode failure with the underlying error attached.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),

    /// Missing or invalid access key.
    #[error("missing or invalid access key")]
    InvalidAccessKey,
}

impl From<reqwest::Error> for RequestError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() {
            return Self::NotConnectedToInternet;
        }
        Self::Other(Box::new(error))
    }
}

impl From<serde_json::Error> for RequestError {
    fn from(error: serde_json::Error) -> Self {
        Self::Other(Box::new(error))
    }
}
