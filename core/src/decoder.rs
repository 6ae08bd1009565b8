//! Body decoding strategies.
//!
//! The response processor only depends on `Decoder<T>`; which concrete
//! strategy runs is chosen when a `Client` is constructed.

use std::fmt;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a body could not be turned into a value.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported media: {0}")]
    Media(String),
}

/// Converts raw response bytes into a `T`.
pub trait Decoder<T>: Send + Sync {
    fn decode(&self, data: &[u8]) -> Result<T, DecodeError>;
}

/// Decodes JSON bodies with `serde_json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl<T: DeserializeOwned> Decoder<T> for JsonDecoder {
    fn decode(&self, data: &[u8]) -> Result<T, DecodeError> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Ignores the body and hands back a fixed model.
#[derive(Clone)]
pub struct MockDecoder<T> {
    model: T,
}

impl<T> MockDecoder<T> {
    pub fn new(model: T) -> Self {
        Self { model }
    }
}

impl<T> fmt::Debug for MockDecoder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MockDecoder<{}>", std::any::type_name::<T>())
    }
}

impl<T: Clone + Send + Sync> Decoder<T> for MockDecoder<T> {
    fn decode(&self, _data: &[u8]) -> Result<T, DecodeError> {
        Ok(self.model.clone())
    }
}
