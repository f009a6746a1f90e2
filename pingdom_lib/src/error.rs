//! Error types for the Pingdom API client.

use crate::response::Response;
use serde::Deserialize;
use thiserror::Error;

/// Base error type for Pingdom operations.
///
/// Variants raised after a response was received carry that [`Response`],
/// see [`Error::response`].
#[derive(Error, Debug)]
pub enum Error {
    /// The configured base URL, or base URL plus resource path, is not a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid HTTP method: {0:?}")]
    InvalidMethod(String),

    /// The HTTP library rejected the request (e.g. a header value with control characters).
    #[error("Failed to build request: {0}")]
    Request(#[source] reqwest::Error),

    /// Network-level failure; no response was obtained.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx status with a well-formed error body.
    #[error("API error: {error}")]
    Api {
        response: Response,
        #[source]
        error: ApiError,
    },

    /// Non-2xx status whose body could not be parsed as an error envelope.
    #[error("Unparsable error body (HTTP {status}): {source}", status = .response.status)]
    ErrorBody {
        response: Response,
        source: serde_json::Error,
    },

    /// 2xx status but the body does not match the requested shape.
    #[error("Failed to decode response body: {source}")]
    Decode {
        response: Response,
        source: serde_json::Error,
    },

    /// No decode target was supplied; raised after a successful round trip.
    #[error("nil target provided to decode_response")]
    NilTarget { response: Response },
}

impl Error {
    /// The response the error was raised for, when the round trip got that far.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Error::Api { response, .. }
            | Error::ErrorBody { response, .. }
            | Error::Decode { response, .. }
            | Error::NilTarget { response } => Some(response),
            _ => None,
        }
    }

    /// The remote service's error, if this is an [`Error::Api`].
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// Error object returned by the API under the `error` key.
///
/// The service sends `errormessage`, `statuscode` and `statusdesc`; a plain
/// `message` field is accepted too. Missing fields decode as empty, and
/// `errormessage` wins when both message keys are present.
#[derive(Error, Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawApiError")]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
    pub status_code: Option<u16>,
    pub status_desc: Option<String>,
}

#[derive(Deserialize)]
struct RawApiError {
    #[serde(default)]
    errormessage: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    statuscode: Option<u16>,
    #[serde(default)]
    statusdesc: Option<String>,
}

impl From<RawApiError> for ApiError {
    fn from(raw: RawApiError) -> Self {
        Self {
            message: raw.errormessage.or(raw.message).unwrap_or_default(),
            status_code: raw.statuscode,
            status_desc: raw.statusdesc,
        }
    }
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            status_desc: None,
        }
    }
}
