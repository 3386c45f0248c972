use std::sync::Arc;

/// Which side of the transfer a progress event describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Request body handed to the network.
    Send,
    /// Response body written to local storage.
    Receive,
}

/// A single progress event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub direction: Direction,

    /// Bytes moved by this event alone.
    pub bytes_this_event: u64,

    /// Bytes moved so far, including this event.
    pub bytes_so_far: u64,

    /// Total expected bytes, if known from the payload or Content-Length header.
    pub bytes_expected: Option<u64>,
}

/// Callback receiving progress events for one operation.
pub type ProgressFn = Arc<dyn Fn(&Progress) + Send + Sync>;

impl Progress {
    /// Calculate the percentage of completion.
    ///
    /// Returns `None` if `bytes_expected` is unknown.
    #[must_use]
    pub fn percentage(&self) -> Option<f64> {
        self.bytes_expected.map(|total| {
            if total == 0 {
                100.0
            } else {
                (self.bytes_so_far as f64 / total as f64) * 100.0
            }
        })
    }

    /// Returns `true` once every expected byte has been moved.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.bytes_expected.is_some_and(|total| self.bytes_so_far >= total)
    }
}
