//! Deterministic transport substitute for tests.
//!
//! # Design
//! `MockTransport` never opens a socket. It answers every request with a
//! canned reply after an optional delay, which lets tests drive the whole
//! pipeline (composition, status checks, decoding) without a server. The
//! delay blocks the calling thread and cannot be interrupted.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::client::Client;
use crate::decoder::MockDecoder;
use crate::error::NetworkError;
use crate::http::{Headers, HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Base URL every mock client is bound to.
pub const MOCK_BASE_URL: &str = "https://example.com";

/// What a `MockTransport` answers with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockReply {
    /// Respond with these body bytes.
    Body(Vec<u8>),
    /// Respond with the request's own body (empty when it had none).
    Echo,
    /// Fail the send with this error.
    Fail(NetworkError),
}

#[derive(Debug, Clone)]
pub struct MockTransport {
    reply: MockReply,
    status: u16,
    headers: Vec<(String, Vec<u8>)>,
    delay: Duration,
}

impl MockTransport {
    pub fn new(reply: MockReply, status: u16) -> Self {
        Self {
            reply,
            status,
            headers: Vec::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn returning(body: impl Into<Vec<u8>>, status: u16) -> Self {
        Self::new(MockReply::Body(body.into()), status)
    }

    pub fn echoing(status: u16) -> Self {
        Self::new(MockReply::Echo, status)
    }

    pub fn failing(error: NetworkError) -> Self {
        Self::new(MockReply::Fail(error), 200)
    }

    /// Sleep for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers
            .push((name.to_string(), value.as_bytes().to_vec()));
        self
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }

        let body = match &self.reply {
            MockReply::Body(body) => body.clone(),
            MockReply::Echo => request.body.clone().unwrap_or_default(),
            MockReply::Fail(error) => return Err(error.clone()),
        };

        Ok(HttpResponse {
            status: self.status,
            headers: self.headers.clone(),
            body,
            url: request.url.clone(),
        })
    }
}

fn mock_base_url() -> Result<Url, NetworkError> {
    Url::parse(MOCK_BASE_URL).map_err(|e| NetworkError::UrlNotComposable(e.to_string()))
}

impl<T: DeserializeOwned + 'static> Client<T> {
    /// Client whose transport answers every call with `result`.
    ///
    /// A successful `result` is encoded as JSON and returned with
    /// `status`; a failing one is returned as the transport error. Either
    /// way the answer arrives after `delay`.
    pub fn mock<M: Serialize>(
        result: Result<M, NetworkError>,
        status: u16,
        delay: Duration,
    ) -> Result<Self, NetworkError> {
        let reply = match result {
            Ok(model) => MockReply::Body(
                serde_json::to_vec(&model).map_err(|e| NetworkError::NotEncodableData(e.to_string()))?,
            ),
            Err(error) => MockReply::Fail(error),
        };
        let transport = MockTransport::new(reply, status).with_delay(delay);
        Ok(Client::with_transport(
            Arc::new(transport),
            mock_base_url()?,
            Headers::new(),
        ))
    }
}

impl<T: Clone + Send + Sync + 'static> Client<T> {
    /// Client that skips JSON entirely: every successful call decodes to
    /// `model`.
    pub fn mock_decoded(model: T, status: u16, delay: Duration) -> Result<Self, NetworkError> {
        let transport = MockTransport::returning(Vec::new(), status).with_delay(delay);
        Ok(Client::from_parts(
            Arc::new(transport),
            Arc::new(MockDecoder::new(model)),
            mock_base_url()?,
            Headers::new(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::http::HttpMethod;

    fn request(body: Option<&[u8]>) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            url: Url::parse("https://example.com/things").unwrap(),
            headers: Headers::new(),
            body: body.map(<[u8]>::to_vec),
        }
    }

    #[test]
    fn returns_canned_body_and_status() {
        let transport = MockTransport::returning(b"hello".to_vec(), 202).with_header("x-mock", "1");
        let response = transport.send(&request(None)).unwrap();
        assert_eq!(response.status, 202);
        assert_eq!(response.body, b"hello");
        assert_eq!(response.url.as_str(), "https://example.com/things");
        assert_eq!(response.headers, vec![("x-mock".to_string(), b"1".to_vec())]);
    }

    #[test]
    fn echoes_request_body() {
        let transport = MockTransport::echoing(200);
        assert_eq!(transport.send(&request(Some(b"ping"))).unwrap().body, b"ping");
        assert!(transport.send(&request(None)).unwrap().body.is_empty());
    }

    #[test]
    fn fails_with_configured_error() {
        let transport = MockTransport::failing(NetworkError::Transport("offline".to_string()));
        let err = transport.send(&request(None)).unwrap_err();
        assert_eq!(err, NetworkError::Transport("offline".to_string()));
    }

    #[test]
    fn waits_for_delay_before_answering() {
        let delay = Duration::from_millis(50);
        let transport = MockTransport::returning(Vec::new(), 200).with_delay(delay);
        let started = Instant::now();
        transport.send(&request(None)).unwrap();
        assert!(started.elapsed() >= delay);
    }
}
