//! HTTP request and response types as plain data.
//!
//! # Design
//! The pipeline builds an `HttpRequest`, hands it to a `Transport`, and gets
//! an `HttpResponse` back. Both are value objects created and dropped within
//! a single call; nothing here holds a connection or any other resource.
//!
//! Raw response header values stay as bytes. Turning them into text is the
//! response processor's job, and a value that is not valid UTF-8 is one of
//! the failures it reports.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

/// Header mapping with unique keys. Ordered so requests are deterministic.
pub type Headers = BTreeMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// The method token as it appears on the request line.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully composed HTTP request.
///
/// Built by the request builder and handed to a `Transport` unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

/// A raw HTTP response as returned by a `Transport`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, Vec<u8>)>,
    pub body: Vec<u8>,
    pub url: Url,
}

impl HttpResponse {
    /// Response with no header fields.
    pub fn new(status: u16, body: Vec<u8>, url: Url) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body,
            url,
        }
    }

    /// Append a text header field.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .push((name.to_string(), value.as_bytes().to_vec()));
        self
    }
}
