use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::RequestError;
use crate::result::Result;

/// Error messages carried in a failure-range response body, e.g.
/// `{ "errors": ["Username is missing", "Password cannot be blank"] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessages {
    pub errors: Vec<String>,
}

/// Classifies one HTTP exchange and decodes the typed payload.
///
/// In order: a transport error fails the call as-is; a missing response
/// fails with `NoHttpResponse`; 200..=298 decodes `T` (no body is
/// `Http(status)`); 400..=498 logs any error body and fails with
/// `Http(status)`; every other status, 299/399/499/5xx included, fails
/// with `InvalidUrl`.
pub(crate) fn handle_response<T: DeserializeOwned>(
    data: Option<&[u8]>,
    status: Option<StatusCode>,
    transport_error: Option<RequestError>,
) -> Result<T> {
    if let Some(error) = transport_error {
        return Err(error);
    }

    let Some(status) = status else {
        return Err(RequestError::NoHttpResponse);
    };

    match status.as_u16() {
        200..=298 => {
            if let Some(data) = data {
                return serde_json::from_slice(data).map_err(RequestError::from);
            }
            Err(RequestError::Http(status))
        }
        400..=498 => {
            if let Some(data) = data {
                if let Ok(messages) = serde_json::from_slice::<ErrorMessages>(data) {
                    tracing::debug!(errors = ?messages.errors, "server reported request errors");
                }
            }
            Err(RequestError::Http(status))
        }
        _ => Err(RequestError::InvalidUrl),
    }
}
