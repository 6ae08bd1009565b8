//! The empty response marker.
//!
//! # Design
//! A client declared as `Client<Empty>` expects no payload: the response
//! processor recognizes the type and skips decoding, returning `body: None`.
//! Detection is by type identity rather than a separate flag so a call shape
//! cannot disagree with its declared response type.

use std::any::TypeId;

use serde::{Deserialize, Serialize};

/// Marker response type meaning "no body expected".
///
/// Serializes to `{}`, so it can also stand in as an empty request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Empty {}

/// True when `T` is the `Empty` marker.
pub(crate) fn is_empty_type<T: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<Empty>()
}
