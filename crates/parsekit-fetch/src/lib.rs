//! Transport and response resolution for the parsekit SDK.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Request descriptors, response metadata, progress and options
//! - [`core`] - Pure resolution of raw transfer outcomes into typed results
//! - [`effects`] - The HTTP client abstraction, session delegate and transport
//!
//! Every operation is attempted exactly once. Fetch, upload and download all
//! converge on the same outcome: the caller's decoded value, or an [`Error`]
//! carrying a backend code (or [`ErrorCode::Unknown`]) and a message.

pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use self::core::{decode, resolve_bytes, resolve_location};
pub use data::{ClientOptions, Direction, Method, Progress, ProgressFn, RawDownload, RawResponse, RawTransfer, Request, ResponseMeta};
pub use effects::{BodyStream, BoxStream, HttpClient, SessionDelegate, Transport, UploadPayload};

#[cfg(feature = "reqwest")]
pub use effects::{ClientError, ReqwestClient};

pub use error::{Error, ErrorCode, ErrorInfo, Result};
