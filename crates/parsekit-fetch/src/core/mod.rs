//! Pure transformations for transfer outcomes.
//!
//! Nothing here performs I/O; the resolver is safe to call from any thread.

pub mod decode;
mod resolve;

pub use resolve::{resolve_bytes, resolve_location};
