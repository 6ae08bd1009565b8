//! Generic client: compose, send, process.
//!
//! # Design
//! `Client<T>` holds a base URL, base headers, a shared transport and a
//! shared decoder, all fixed at construction. Every call runs the same
//! one-shot pipeline (build, send, process) and keeps no state afterwards,
//! so a client can be cloned freely and used from several threads at once.
//!
//! The three call shapes differ only in what they hand back:
//! `full_response` returns headers, URL and body; `response` returns the body
//! and insists there is one; `result` runs against the `Empty` marker and
//! only reports success or failure.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error};
use url::Url;

use crate::decoder::{Decoder, JsonDecoder};
use crate::error::NetworkError;
use crate::http::Headers;
use crate::media::{Media, MediaDecoder};
use crate::request::{build_request, Call};
use crate::response::{process, TypedResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::Empty;

/// Client for one backend, decoding response bodies into `T`.
pub struct Client<T> {
    base_url: Url,
    base_headers: Headers,
    transport: Arc<dyn Transport>,
    decoder: Arc<dyn Decoder<T>>,
}

impl<T: DeserializeOwned + 'static> Client<T> {
    /// Live client over `UreqTransport`, decoding JSON bodies.
    pub fn live(base_url: Url, base_headers: Headers) -> Self {
        Self::with_transport(Arc::new(UreqTransport::new()), base_url, base_headers)
    }

    /// JSON client over a caller-supplied transport.
    pub fn with_transport(transport: Arc<dyn Transport>, base_url: Url, base_headers: Headers) -> Self {
        Self::from_parts(transport, Arc::new(JsonDecoder), base_url, base_headers)
    }
}

impl<T: Media + 'static> Client<T> {
    /// Live client for binary media bodies such as images.
    pub fn media(base_url: Url, base_headers: Headers) -> Self {
        Self::from_parts(
            Arc::new(UreqTransport::new()),
            Arc::new(MediaDecoder),
            base_url,
            base_headers,
        )
    }
}

impl<T: 'static> Client<T> {
    pub fn from_parts(
        transport: Arc<dyn Transport>,
        decoder: Arc<dyn Decoder<T>>,
        base_url: Url,
        base_headers: Headers,
    ) -> Self {
        Self {
            base_url,
            base_headers,
            transport,
            decoder,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn base_headers(&self) -> &Headers {
        &self.base_headers
    }

    /// Run the call and return headers, URL and decoded body.
    ///
    /// The body is `None` only when `T` is `Empty`.
    pub fn full_response<B>(&self, call: Call<'_, B>) -> Result<TypedResponse<T>, NetworkError>
    where
        B: Serialize + ?Sized,
    {
        self.run(&call, self.decoder.as_ref())
    }

    /// Run the call and return only the decoded body.
    ///
    /// Fails with `MismatchingRequestedResponseType` when the client was
    /// declared against `Empty`, since there is no body to return.
    pub fn response<B>(&self, call: Call<'_, B>) -> Result<T, NetworkError>
    where
        B: Serialize + ?Sized,
    {
        self.full_response(call)?
            .body
            .ok_or(NetworkError::MismatchingRequestedResponseType)
    }

    /// Run the call without decoding the body; only success or failure.
    pub fn result<B>(&self, call: Call<'_, B>) -> Result<(), NetworkError>
    where
        B: Serialize + ?Sized,
    {
        let decoder: &dyn Decoder<Empty> = &JsonDecoder;
        self.run(&call, decoder).map(|_| ())
    }

    fn run<U, B>(&self, call: &Call<'_, B>, decoder: &dyn Decoder<U>) -> Result<TypedResponse<U>, NetworkError>
    where
        U: 'static,
        B: Serialize + ?Sized,
    {
        let request = build_request(&self.base_url, &self.base_headers, call)?;
        debug!(method = %request.method, url = %request.url, "sending request");

        // Transports and decoders can be user code; a panic in either must
        // not unwind into the caller.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let raw = self.transport.send(&request)?;
            process(raw, call.expected_status, decoder)
        }));

        outcome.unwrap_or_else(|_| {
            error!(method = %request.method, url = %request.url, "request pipeline panicked");
            Err(NetworkError::Unknown)
        })
    }
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            base_headers: self.base_headers.clone(),
            transport: Arc::clone(&self.transport),
            decoder: Arc::clone(&self.decoder),
        }
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("base_headers", &self.base_headers)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}
