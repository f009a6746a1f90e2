//! Response validation and JSON decoding.

use crate::error::{ApiError, Error};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

/// Status line and headers of a completed round trip.
///
/// The body is consumed by [`crate::Client::execute`] and is not kept here.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub url: Url,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url) -> Self {
        Self {
            status,
            headers,
            url,
        }
    }

    pub(crate) fn from_http(res: &reqwest::Response) -> Self {
        Self::new(res.status(), res.headers().clone(), res.url().clone())
    }

    /// True for 200..=299.
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

/// Succeeds for a 2xx status; otherwise decodes `{"error": {...}}` from the body.
///
/// An error body that is not valid JSON, or lacks the envelope, yields
/// [`Error::ErrorBody`] rather than [`Error::Api`].
pub fn validate_response(response: &Response, body: &[u8]) -> Result<(), Error> {
    if response.is_success() {
        return Ok(());
    }
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(envelope) => Err(Error::Api {
            response: response.clone(),
            error: envelope.error,
        }),
        Err(source) => Err(Error::ErrorBody {
            response: response.clone(),
            source,
        }),
    }
}

/// Decode `body` into `target`. The target is only written on success.
pub fn decode_response<T: DeserializeOwned>(
    response: &Response,
    body: &[u8],
    target: Option<&mut T>,
) -> Result<(), Error> {
    let target = target.ok_or_else(|| Error::NilTarget {
        response: response.clone(),
    })?;
    *target = decode_body(response, body)?;
    Ok(())
}

pub(crate) fn decode_body<T: DeserializeOwned>(response: &Response, body: &[u8]) -> Result<T, Error> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        response: response.clone(),
        source,
    })
}
