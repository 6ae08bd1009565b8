//! Request composition: target URL, merged headers, encoded body.
//!
//! # Design
//! `Call` carries the per-call parameters and their defaults (GET, no query,
//! no body, no extra headers, expect 200). Its body type is a generic
//! parameter, so serialization is resolved per call site and no type erasure
//! is involved. `build_request` combines a `Call` with the client's fixed
//! base URL and base headers into an `HttpRequest`.

use serde::Serialize;
use tracing::warn;
use url::Url;

use crate::error::NetworkError;
use crate::http::{Headers, HttpMethod, HttpRequest};
use crate::types::Empty;

const CONTENT_TYPE: &str = "content-type";
const JSON_CONTENT_TYPE: &str = "application/json";

/// Parameters of a single request.
#[derive(Debug, Clone)]
pub struct Call<'a, B: ?Sized = Empty> {
    pub(crate) endpoint: String,
    pub(crate) method: HttpMethod,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<&'a B>,
    pub(crate) headers: Headers,
    pub(crate) expected_status: u16,
}

impl Call<'static, Empty> {
    /// A GET to `endpoint` with no body, expecting 200.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: HttpMethod::Get,
            query: Vec::new(),
            body: None,
            headers: Headers::new(),
            expected_status: 200,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint).method(HttpMethod::Post)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint).method(HttpMethod::Put)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint).method(HttpMethod::Patch)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint).method(HttpMethod::Delete)
    }
}

impl Default for Call<'static, Empty> {
    fn default() -> Self {
        Self::new("")
    }
}

impl<'a, B: ?Sized> Call<'a, B> {
    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    /// Append a query item. Items keep the order they were added in.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set an additional header; overrides a base header with the same key.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: Headers) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    /// Attach a request body, serialized as JSON when the request is built.
    pub fn body<'b, C: Serialize + ?Sized>(self, body: &'b C) -> Call<'b, C> {
        Call {
            endpoint: self.endpoint,
            method: self.method,
            query: self.query,
            body: Some(body),
            headers: self.headers,
            expected_status: self.expected_status,
        }
    }

    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }
}

/// Join `endpoint` and `query` onto `base`.
///
/// An empty endpoint resolves to `base` itself. Otherwise a leading `/` is
/// optional, and each `/`-separated segment is percent-encoded and appended
/// to the base path. Query items are form-encoded after the path.
pub fn compose_url(
    base: &Url,
    endpoint: &str,
    query: &[(String, String)],
) -> Result<Url, NetworkError> {
    let mut url = base.clone();

    if !endpoint.is_empty() {
        if endpoint.contains('?') {
            warn!(
                endpoint,
                "endpoint contains `?` and will be percent-encoded into the path; pass query items separately"
            );
        }
        let path = endpoint.strip_prefix('/').unwrap_or(endpoint);
        url.path_segments_mut()
            .map_err(|()| NetworkError::UrlNotComposable(base.to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    Ok(url)
}

/// Merge `additional` over `base`; on a shared key the additional value wins.
///
/// Names are compared ASCII case-insensitively, and the winning entry keeps
/// the spelling of the additional key.
pub fn compose_headers(base: &Headers, additional: &Headers) -> Headers {
    let mut merged = base.clone();
    for (name, value) in additional {
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        merged.insert(name.clone(), value.clone());
    }
    merged
}

/// Serialize an optional body as JSON. `None` is passed through untouched.
pub fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> Result<Option<Vec<u8>>, NetworkError> {
    body.map(|body| {
        serde_json::to_vec(body).map_err(|e| NetworkError::NotEncodableData(e.to_string()))
    })
    .transpose()
}

/// Build the `HttpRequest` for `call` against a client's base URL and headers.
pub fn build_request<B: Serialize + ?Sized>(
    base_url: &Url,
    base_headers: &Headers,
    call: &Call<'_, B>,
) -> Result<HttpRequest, NetworkError> {
    let url = compose_url(base_url, &call.endpoint, &call.query)?;
    let mut headers = compose_headers(base_headers, &call.headers);
    let body = encode_body(call.body)?;

    if body.is_some() && !headers.keys().any(|k| k.eq_ignore_ascii_case(CONTENT_TYPE)) {
        headers.insert(CONTENT_TYPE.to_string(), JSON_CONTENT_TYPE.to_string());
    }

    Ok(HttpRequest {
        method: call.method,
        url,
        headers,
        body,
    })
}
