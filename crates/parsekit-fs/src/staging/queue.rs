use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Concurrent queue that runs blocking filesystem jobs off the caller's task.
///
/// Jobs run on the runtime's blocking pool, at most `max_concurrency` at a
/// time. Independent jobs are not ordered. A job keeps running to completion
/// even if the future awaiting it is dropped.
#[derive(Clone, Debug)]
pub struct WorkQueue {
    permits:         Arc<Semaphore>,
    max_concurrency: usize,
}

impl WorkQueue {
    pub fn new(max_concurrency: usize) -> Self {
        let max_concurrency = max_concurrency.max(1);
        Self {
            permits: Arc::new(Semaphore::new(max_concurrency)),
            max_concurrency,
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub async fn run<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce() -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| Error::Queue(e.to_string()))?;

        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| Error::Queue(e.to_string()))?
    }
}
