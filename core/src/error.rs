//! Error types for the request/response pipeline.
//!
//! # Design
//! `NetworkError` is a closed set: every failure the pipeline can produce maps
//! to exactly one variant. Variants carry the payload a caller needs to
//! diagnose the failure (both status codes on a mismatch, the offending bytes
//! on a decode failure) and nothing else.
//!
//! The type is `Clone + PartialEq` so canned failures can be handed to mock
//! transports and whole results compared in tests.

use thiserror::Error;

/// Errors returned by every `Client` call shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// The transport returned something without an HTTP-shaped status line.
    #[error("response is not an HTTP response")]
    BadUrlResponse,

    /// The response status differs from the one the caller expected.
    #[error("expected status {expected}, got {actual}")]
    MismatchingStatusCodes { expected: u16, actual: u16 },

    /// A response header value is not text.
    #[error("response headers are not parseable")]
    NotParseableHeaders,

    /// The response body could not be decoded into the requested type.
    #[error("response body is not decodable into {model}")]
    NotDecodableData { model: &'static str, data: Vec<u8> },

    /// The request body could not be serialized.
    #[error("request body is not encodable: {0}")]
    NotEncodableData(String),

    /// A body was requested but the call was made against the empty type.
    #[error("requested a body from a call that expects none")]
    MismatchingRequestedResponseType,

    /// The endpoint could not be joined onto the base URL.
    #[error("url is not composable: {0}")]
    UrlNotComposable(String),

    /// The transport failed before producing a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A failure that none of the pipeline steps reported in typed form.
    #[error("unknown error")]
    Unknown,
}

impl NetworkError {
    /// For `NotDecodableData`, the offending body re-rendered as indented
    /// JSON. `None` for other variants or when the body is not JSON.
    pub fn pretty_printed_json(&self) -> Option<String> {
        match self {
            NetworkError::NotDecodableData { data, .. } => {
                let value: serde_json::Value = serde_json::from_slice(data).ok()?;
                serde_json::to_string_pretty(&value).ok()
            }
            _ => None,
        }
    }
}
