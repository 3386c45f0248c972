//! I/O operations for transfers.
//!
//! The [`HttpClient`] trait is the network boundary; [`Transport`] drives it
//! and funnels every raw outcome through the resolver.

mod http;
mod session;
mod transport;

pub use http::{BoxStream, HttpClient};
pub use session::{BodyStream, SessionDelegate, UploadPayload};
pub use transport::Transport;

#[cfg(feature = "reqwest")]
pub use http::{ClientError, ReqwestClient};
