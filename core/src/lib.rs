//! Typed request/response pipeline over a pluggable HTTP transport.
//!
//! # Overview
//! A `Client<T>` composes a request (base URL + endpoint + query, merged
//! headers, JSON body), sends it through a `Transport`, checks the status
//! code and decodes the body into `T`. Every call is a one-shot
//! build → send → process pipeline with no state kept between calls.
//!
//! # Design
//! - `Transport` is the only I/O boundary. `UreqTransport` talks to the
//!   network; `MockTransport` answers with canned data after an optional
//!   delay, so the rest of the pipeline runs unchanged in tests.
//! - Decoding is a `Decoder<T>` chosen at construction: JSON by default,
//!   `MediaDecoder` for binary bodies, `MockDecoder` for fixed models.
//! - `Empty` marks calls that expect no body; decoding is skipped for it.
//! - Every step returns `Result<_, NetworkError>` from a closed error set.
//!
//! ```no_run
//! use netclient_core::{Call, Client, Headers};
//! use serde::Deserialize;
//! use url::Url;
//!
//! #[derive(Deserialize)]
//! struct Status {
//!     healthy: bool,
//! }
//!
//! let client: Client<Status> =
//!     Client::live(Url::parse("https://api.example.com").unwrap(), Headers::new());
//! let status = client.response(Call::get("status").query("verbose", "1"));
//! ```

pub mod client;
pub mod decoder;
pub mod error;
pub mod http;
pub mod media;
pub mod mock;
pub mod request;
pub mod response;
pub mod service;
pub mod transport;
pub mod types;

pub use client::Client;
pub use decoder::{DecodeError, Decoder, JsonDecoder, MockDecoder};
pub use error::NetworkError;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use media::{Image, ImageFormat, Media, MediaDecoder};
pub use mock::{MockReply, MockTransport, MOCK_BASE_URL};
pub use request::Call;
pub use response::TypedResponse;
pub use service::Service;
pub use transport::{Transport, UreqTransport};
pub use types::Empty;
