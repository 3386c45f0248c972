use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use bytes::Bytes;
use futures_util::stream;
use tokio_util::io::ReaderStream;

use crate::data::{Direction, Progress, ProgressFn};
use crate::error::{Error, Result};

use super::http::BoxStream;

/// An outgoing request body, produced fresh for every (re)send.
pub type BodyStream = BoxStream<'static, io::Result<Bytes>>;

const BODY_CHUNK_SIZE: usize = 64 * 1024;

/// The single source of an upload's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPayload {
    Bytes(Bytes),
    File(PathBuf),
}

impl UploadPayload {
    /// Exactly one of `bytes` and `file` must be given.
    pub fn from_parts(bytes: Option<Bytes>, file: Option<PathBuf>) -> Result<Self> {
        match (bytes, file) {
            (Some(bytes), None) => Ok(UploadPayload::Bytes(bytes)),
            (None, Some(file)) => Ok(UploadPayload::File(file)),
            (None, None) => Err(Error::InvalidInput("payload and file both can't be nil")),
            (Some(_), Some(_)) => Err(Error::InvalidInput("payload and file can't both be set")),
        }
    }

    /// Body size in bytes; reads file metadata for file payloads.
    pub fn size(&self) -> io::Result<u64> {
        match self {
            UploadPayload::Bytes(bytes) => Ok(bytes.len() as u64),
            UploadPayload::File(path) => Ok(std::fs::metadata(path)?.len()),
        }
    }

    /// Open a new stream over the whole payload, from its first byte.
    ///
    /// Every call yields the same content, so a transport may replay the body
    /// as often as it needs to.
    pub fn open(&self) -> io::Result<BodyStream> {
        match self {
            UploadPayload::Bytes(bytes) => {
                let chunks: Vec<io::Result<Bytes>> = (0..bytes.len())
                    .step_by(BODY_CHUNK_SIZE)
                    .map(|start| Ok(bytes.slice(start..bytes.len().min(start + BODY_CHUNK_SIZE))))
                    .collect();
                Ok(Box::pin(stream::iter(chunks)))
            }
            UploadPayload::File(path) => {
                let file = std::fs::File::open(path)?;
                Ok(Box::pin(ReaderStream::with_capacity(
                    tokio::fs::File::from_std(file),
                    BODY_CHUNK_SIZE,
                )))
            }
        }
    }
}

/// Side channel between one in-flight operation and its network primitive.
///
/// Created per operation by the [`Transport`](crate::Transport) and never
/// shared across operations. Clones refer to the same operation.
#[derive(Clone, Default)]
pub struct SessionDelegate {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    progress: Mutex<Option<ProgressFn>>,
    payload:  Option<UploadPayload>,
}

impl SessionDelegate {
    pub fn new(progress: Option<ProgressFn>, payload: Option<UploadPayload>) -> Self {
        Self {
            inner: Arc::new(Inner {
                progress: Mutex::new(progress),
                payload,
            }),
        }
    }

    pub fn payload(&self) -> Option<&UploadPayload> {
        self.inner.payload.as_ref()
    }

    /// Expected upload size, when it can be determined.
    pub fn payload_len(&self) -> Option<u64> {
        self.inner.payload.as_ref().and_then(|p| p.size().ok())
    }

    pub fn has_progress(&self) -> bool {
        self.current_progress().is_some()
    }

    /// Request body bytes were handed to the network.
    pub fn did_send_body_data(&self, bytes_sent: u64, total_bytes_sent: u64, expected: Option<u64>) {
        self.report(Progress {
            direction:        Direction::Send,
            bytes_this_event: bytes_sent,
            bytes_so_far:     total_bytes_sent,
            bytes_expected:   expected,
        });
    }

    /// Response body bytes were written to the download location.
    pub fn did_write_data(&self, bytes_written: u64, total_bytes_written: u64, expected: Option<u64>) {
        self.report(Progress {
            direction:        Direction::Receive,
            bytes_this_event: bytes_written,
            bytes_so_far:     total_bytes_written,
            bytes_expected:   expected,
        });
    }

    /// The download is complete; no progress is reported after this.
    pub fn did_finish_downloading(&self, location: &Path) {
        tracing::debug!(location = %location.display(), "download materialised");
        *self.inner.progress.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// A fresh body stream for the upload payload, or `None` when the
    /// operation has no payload.
    pub fn need_new_body_stream(&self) -> Option<io::Result<BodyStream>> {
        self.inner.payload.as_ref().map(UploadPayload::open)
    }

    fn current_progress(&self) -> Option<ProgressFn> {
        self.inner
            .progress
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn report(&self, progress: Progress) {
        if let Some(callback) = self.current_progress() {
            callback(&progress);
        }
    }
}

impl fmt::Debug for SessionDelegate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionDelegate")
            .field("payload", &self.inner.payload)
            .field("progress", &self.has_progress().then_some("{ ... }"))
            .finish()
    }
}
