use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;

use super::http::HttpClient;
use super::session::{SessionDelegate, UploadPayload};
use crate::core::{resolve_bytes, resolve_location};
use crate::data::{ProgressFn, RawTransfer, Request, ResponseMeta};
use crate::error::Result;

/// Issues requests through an [`HttpClient`] and resolves their outcomes.
///
/// Each call creates its own [`SessionDelegate`], runs exactly one network
/// primitive and resolves its raw outcome exactly once. Nothing is retried.
pub struct Transport<C> {
    client: Arc<C>,
}

impl<C> Clone for Transport<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> Transport<C> {
    pub fn new(client: C) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn from_arc(client: Arc<C>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch `request` and decode the response body.
    pub async fn fetch<T, D, E>(&self, request: &Request, decode: D) -> Result<T>
    where
        D: FnOnce(&[u8]) -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        issue(request, "fetch");
        let session = SessionDelegate::new(None, None);
        let raw = self.client.data(request, &session).await;
        finish(request, "fetch", &raw, |raw| {
            resolve_bytes(raw.payload.as_deref(), raw.response.as_ref(), transport_error(raw), decode)
        })
    }

    /// Upload exactly one of `payload` and `file` as the body of `request`.
    ///
    /// Supplying neither, or both, fails with
    /// [`Error::InvalidInput`](crate::Error::InvalidInput) before any network
    /// activity.
    pub async fn upload<T, D, E>(
        &self,
        request: &Request,
        payload: Option<Bytes>,
        file: Option<PathBuf>,
        progress: Option<ProgressFn>,
        decode: D,
    ) -> Result<T>
    where
        D: FnOnce(&[u8]) -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        let payload = UploadPayload::from_parts(payload, file).inspect_err(|e| {
            tracing::warn!(url = %request.url, error = %e, "upload rejected");
        })?;
        issue(request, "upload");
        let session = SessionDelegate::new(progress, Some(payload));
        let raw = self.client.upload(request, &session).await;
        finish(request, "upload", &raw, |raw| {
            resolve_bytes(raw.payload.as_deref(), raw.response.as_ref(), transport_error(raw), decode)
        })
    }

    /// Download the response body of `request` to a local file.
    ///
    /// `decode` receives the file's location serialised as a JSON string, so
    /// [`decode::location`](crate::decode::location) yields the path itself.
    pub async fn download<T, D, E>(
        &self,
        request: &Request,
        progress: Option<ProgressFn>,
        decode: D,
    ) -> Result<T>
    where
        D: FnOnce(&[u8]) -> std::result::Result<T, E>,
        E: fmt::Display,
    {
        issue(request, "download");
        let session = SessionDelegate::new(progress, None);
        let raw = self.client.download(request, &session).await;
        finish(request, "download", &raw, |raw| {
            resolve_location(raw.payload.as_deref(), raw.response.as_ref(), transport_error(raw), decode)
        })
    }
}

impl<C> fmt::Debug for Transport<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

fn transport_error<P, E>(raw: &RawTransfer<P, E>) -> Option<&(dyn StdError + 'static)>
where
    E: StdError + 'static,
{
    raw.error.as_ref().map(|e| e as &(dyn StdError + 'static))
}

fn issue(request: &Request, operation: &'static str) {
    tracing::debug!(operation, method = %request.method, url = %request.url, "issuing request");
}

fn finish<P, E, T>(
    request: &Request,
    operation: &'static str,
    raw: &RawTransfer<P, E>,
    resolve: impl FnOnce(&RawTransfer<P, E>) -> Result<T>,
) -> Result<T> {
    let status = raw.response.as_ref().map(|meta| meta.status);
    let http_success = raw.response.as_ref().map(ResponseMeta::is_success);
    let outcome = resolve(raw);
    match &outcome {
        Ok(_) => tracing::debug!(
            operation,
            method = %request.method,
            url = %request.url,
            ?status,
            ?http_success,
            "request resolved"
        ),
        Err(e) => tracing::warn!(
            operation,
            method = %request.method,
            url = %request.url,
            ?status,
            ?http_success,
            code = %e.code(),
            error = %e,
            "request failed"
        ),
    }
    outcome
}
