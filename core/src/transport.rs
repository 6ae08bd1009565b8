//! Transport abstraction and the live `ureq` implementation.
//!
//! # Design
//! A `Transport` sends one fully composed `HttpRequest` and returns the raw
//! response. It is the only place the pipeline performs I/O and the only
//! place a call blocks. Status codes are data at this layer: a 404 or 500 is
//! a successful send, and judging it is left to the response processor.

use std::fmt;

use tracing::debug;
use ureq::http::Response;
use ureq::typestate::{WithBody, WithoutBody};
use ureq::{Agent, Body, RequestBuilder};

use crate::error::NetworkError;
use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};

/// Sends a request and returns the raw response.
///
/// Implementations make exactly one attempt and fold every failure below
/// HTTP (DNS, TLS, connection) into `NetworkError::Transport`.
pub trait Transport: Send + Sync + fmt::Debug {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError>;
}

/// Live transport backed by a `ureq::Agent`.
///
/// Timeouts, redirects and TLS are whatever the agent is configured with.
/// Response bodies are read in full with no size cap unless one is set with
/// `with_body_limit`.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
    body_limit: u64,
}

impl UreqTransport {
    /// Transport with ureq's defaults, except that non-2xx statuses are
    /// returned as responses instead of errors.
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::from_agent(agent)
    }

    /// Use a caller-configured agent. The agent should have
    /// `http_status_as_error(false)`, otherwise non-2xx statuses surface as
    /// transport errors rather than status mismatches.
    pub fn from_agent(agent: Agent) -> Self {
        Self {
            agent,
            body_limit: u64::MAX,
        }
    }

    /// Fail with `NetworkError::Transport` when a response body is larger
    /// than `bytes`.
    pub fn with_body_limit(mut self, bytes: u64) -> Self {
        self.body_limit = bytes;
        self
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UreqTransport")
            .field("body_limit", &self.body_limit)
            .finish_non_exhaustive()
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        let url = request.url.as_str();
        let sent = match request.method {
            HttpMethod::Get => send_without_body(self.agent.get(url), request),
            HttpMethod::Delete => send_without_body(self.agent.delete(url), request),
            HttpMethod::Post => send_with_body(self.agent.post(url), request),
            HttpMethod::Put => send_with_body(self.agent.put(url), request),
            HttpMethod::Patch => send_with_body(self.agent.patch(url), request),
        };

        let mut response = sent.map_err(|e| {
            debug!(method = %request.method, url, error = %e, "transport failure");
            NetworkError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.as_bytes().to_vec()))
            .collect();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.body_limit)
            .read_to_vec()
            .map_err(|e| NetworkError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
            url: request.url.clone(),
        })
    }
}

fn with_headers<S>(builder: RequestBuilder<S>, headers: &Headers) -> RequestBuilder<S> {
    headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()))
}

fn send_without_body(
    builder: RequestBuilder<WithoutBody>,
    request: &HttpRequest,
) -> Result<Response<Body>, ureq::Error> {
    let builder = with_headers(builder, &request.headers);
    match &request.body {
        Some(body) => builder.force_send_body().send(body.as_slice()),
        None => builder.call(),
    }
}

fn send_with_body(
    builder: RequestBuilder<WithBody>,
    request: &HttpRequest,
) -> Result<Response<Body>, ureq::Error> {
    let builder = with_headers(builder, &request.headers);
    match &request.body {
        Some(body) => builder.send(body.as_slice()),
        None => builder.send_empty(),
    }
}
