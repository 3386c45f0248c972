//! Ready-made decode functions for the transport.
//!
//! Any `FnOnce(&[u8]) -> Result<T, E>` with a displayable `E` works as a
//! decode function; these cover the common cases.

use std::convert::Infallible;
use std::path::PathBuf;

use bytes::Bytes;
use serde::de::DeserializeOwned;

/// Deserialise the body as JSON.
///
/// # Examples
///
/// ```
/// use parsekit_fetch::decode;
///
/// let value: serde_json::Value = decode::json(br#"{"objectId":"abc123"}"#).unwrap();
/// assert_eq!(value["objectId"], "abc123");
/// ```
pub fn json<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<T> {
    serde_json::from_slice(bytes)
}

/// Read back the local path a download was written to.
pub fn location(bytes: &[u8]) -> serde_json::Result<PathBuf> {
    serde_json::from_slice(bytes)
}

/// Keep the body as-is.
pub fn raw(bytes: &[u8]) -> Result<Bytes, Infallible> {
    Ok(Bytes::copy_from_slice(bytes))
}

/// Ignore the body, for endpoints whose success carries no payload.
pub fn ignore(_bytes: &[u8]) -> Result<(), Infallible> {
    Ok(())
}
