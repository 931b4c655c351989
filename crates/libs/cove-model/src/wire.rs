//! Wire codec for descriptor payloads.
//!
//! Descriptors cross the IPC boundary as field-tagged msgpack
//! (`rmp_serde::to_vec_named`): every field is keyed by name and every
//! tagged-union variant carries an explicit `kind` discriminant. Optional
//! fields default on receipt instead of failing, so newer hosts can decode
//! payloads from older SDKs and vice versa.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum WireError {
    #[error("payload encode failed: {0}")]
    Encode(String),
    #[error("payload decode failed: {0}")]
    Decode(String),
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, WireError> {
    rmp_serde::to_vec_named(value).map_err(|err| WireError::Encode(err.to_string()))
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, WireError> {
    rmp_serde::from_slice(bytes).map_err(|err| WireError::Decode(err.to_string()))
}
