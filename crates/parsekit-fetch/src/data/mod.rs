//! Immutable data types for transfer operations.
//!
//! Request descriptors going out, response metadata and raw outcomes coming
//! back, progress events and client configuration.

pub mod options;
pub mod progress;
pub mod request;
pub mod response;

pub use options::ClientOptions;
pub use progress::{Direction, Progress, ProgressFn};
pub use request::{Method, Request};
pub use response::{RawDownload, RawResponse, RawTransfer, ResponseMeta};
