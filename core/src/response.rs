//! Response processing: status line, status code, headers, typed body.
//!
//! # Design
//! `process` runs its checks in a fixed order and stops at the first one that
//! fails, so each failure maps to exactly one `NetworkError` variant. Status
//! matching is exact equality against the code the caller asked for; there
//! is no notion of "any 2xx".

use std::any::type_name;

use tracing::debug;
use url::Url;

use crate::decoder::Decoder;
use crate::error::NetworkError;
use crate::http::{Headers, HttpResponse};
use crate::types::is_empty_type;

/// A processed response: parsed headers plus the decoded body.
///
/// `body` is `None` only when the call was made against `Empty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedResponse<T> {
    pub headers: Headers,
    pub body: Option<T>,
    pub url: Url,
}

/// Validate `raw` against `expected_status` and decode its body into `T`.
pub fn process<T: 'static>(
    raw: HttpResponse,
    expected_status: u16,
    decoder: &dyn Decoder<T>,
) -> Result<TypedResponse<T>, NetworkError> {
    let headers = validate(&raw, expected_status)?;

    if is_empty_type::<T>() {
        return Ok(TypedResponse {
            headers,
            body: None,
            url: raw.url,
        });
    }

    let body = match decoder.decode(&raw.body) {
        Ok(body) => body,
        Err(err) => {
            debug!(url = %raw.url, model = type_name::<T>(), error = %err, "response body not decodable");
            return Err(NetworkError::NotDecodableData {
                model: type_name::<T>(),
                data: raw.body,
            });
        }
    };

    Ok(TypedResponse {
        headers,
        body: Some(body),
        url: raw.url,
    })
}

/// Status line, status code and header checks, without touching the body.
pub fn validate(raw: &HttpResponse, expected_status: u16) -> Result<Headers, NetworkError> {
    if !(100..=999).contains(&raw.status) {
        debug!(url = %raw.url, status = raw.status, "response has no valid status line");
        return Err(NetworkError::BadUrlResponse);
    }

    if raw.status != expected_status {
        debug!(url = %raw.url, expected = expected_status, actual = raw.status, "status code mismatch");
        return Err(NetworkError::MismatchingStatusCodes {
            expected: expected_status,
            actual: raw.status,
        });
    }

    parse_headers(&raw.headers)
}

/// Turn raw header fields into a text mapping. Repeated names are joined
/// with `", "` in arrival order.
fn parse_headers(fields: &[(String, Vec<u8>)]) -> Result<Headers, NetworkError> {
    let mut headers = Headers::new();
    for (name, value) in fields {
        let value = std::str::from_utf8(value).map_err(|_| {
            debug!(header = %name, "header value is not text");
            NetworkError::NotParseableHeaders
        })?;
        headers
            .entry(name.clone())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(value);
            })
            .or_insert_with(|| value.to_string());
    }
    Ok(headers)
}
