use std::fmt;
use std::path::PathBuf;

use bytes::Bytes;

/// Response metadata as reported by the network primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMeta {
    pub status:  u16,
    pub url:     String,
    pub headers: Vec<(String, String)>,
}

impl ResponseMeta {
    pub fn new(status: u16, url: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header_value("content-length").and_then(|v| v.trim().parse().ok())
    }
}

impl fmt::Display for ResponseMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {} from {}", self.status, self.url)
    }
}

/// What a network primitive hands back once a transfer ends.
///
/// Any combination of the three fields may be present; the resolver decides
/// which one wins.
#[derive(Debug)]
pub struct RawTransfer<P, E> {
    pub payload:  Option<P>,
    pub response: Option<ResponseMeta>,
    pub error:    Option<E>,
}

/// Raw outcome of a data fetch or upload: the body bytes.
pub type RawResponse<E> = RawTransfer<Bytes, E>;

/// Raw outcome of a download: where the body was written locally.
pub type RawDownload<E> = RawTransfer<PathBuf, E>;

impl<P, E> RawTransfer<P, E> {
    pub fn completed(payload: P, response: ResponseMeta) -> Self {
        Self {
            payload:  Some(payload),
            response: Some(response),
            error:    None,
        }
    }

    pub fn failed(error: E) -> Self {
        Self {
            payload:  None,
            response: None,
            error:    Some(error),
        }
    }

    /// The request reached the server but the body could not be obtained.
    pub fn interrupted(response: ResponseMeta, error: E) -> Self {
        Self {
            payload:  None,
            response: Some(response),
            error:    Some(error),
        }
    }

    pub fn empty(response: Option<ResponseMeta>) -> Self {
        Self {
            payload: None,
            response,
            error: None,
        }
    }
}
