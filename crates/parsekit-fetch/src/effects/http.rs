use std::future::Future;
use std::pin::Pin;

use futures_util::Stream;

use crate::data::{RawDownload, RawResponse, Request};

use super::session::SessionDelegate;

/// A boxed stream type for request and response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// The three network primitives a [`Transport`](crate::Transport) is built on.
///
/// Implementations never fail in the `Result` sense: whatever happened is
/// described by the returned [`RawTransfer`](crate::RawTransfer), including a
/// response with a non-2xx status, which is not a transport error. Progress is
/// reported through the [`SessionDelegate`].
///
/// # Implementations
///
/// - [`ReqwestClient`]: Production implementation using `reqwest`
/// - Mock implementations for testing
pub trait HttpClient: Send + Sync {
    /// Error type for transport-level failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Send `request` and collect the response body in memory.
    fn data(
        &self,
        request: &Request,
        session: &SessionDelegate,
    ) -> impl Future<Output = RawResponse<Self::Error>> + Send;

    /// Send `request` with the body supplied by
    /// [`SessionDelegate::need_new_body_stream`], reporting sent bytes.
    /// A session without a payload fails without contacting the server.
    fn upload(
        &self,
        request: &Request,
        session: &SessionDelegate,
    ) -> impl Future<Output = RawResponse<Self::Error>> + Send;

    /// Send `request` and write the response body to a local file, reporting
    /// written bytes. The returned payload is the file's location.
    fn download(
        &self,
        request: &Request,
        session: &SessionDelegate,
    ) -> impl Future<Output = RawDownload<Self::Error>> + Send;
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use std::io;
    use std::path::PathBuf;

    use futures_util::StreamExt;
    use thiserror::Error;
    use tokio::io::AsyncWriteExt;

    use super::*;
    use crate::data::{ClientOptions, Method, RawTransfer, ResponseMeta};

    /// Transport-level failure raised by [`ReqwestClient`].
    #[derive(Debug, Error)]
    pub enum ClientError {
        #[error(transparent)]
        Http(#[from] reqwest::Error),

        #[error("unable to stage download")]
        Stage(#[from] io::Error),

        #[error("unable to read upload body")]
        Body(#[source] io::Error),

        #[error("upload session carries no payload")]
        MissingBody,
    }

    /// Production HTTP client implementation using reqwest.
    #[derive(Debug, Clone)]
    pub struct ReqwestClient {
        client:  reqwest::Client,
        options: ClientOptions,
    }

    impl ReqwestClient {
        /// Create a new ReqwestClient with default configuration.
        pub fn new() -> Result<Self, reqwest::Error> {
            Self::with_options(ClientOptions::default())
        }

        pub fn with_options(options: ClientOptions) -> Result<Self, reqwest::Error> {
            let mut builder = reqwest::Client::builder()
                .timeout(options.timeout)
                .connect_timeout(options.connect_timeout);
            if let Some(user_agent) = &options.user_agent {
                builder = builder.user_agent(user_agent.as_str());
            }
            Ok(Self {
                client: builder.build()?,
                options,
            })
        }

        pub fn options(&self) -> &ClientOptions {
            &self.options
        }

        fn prepare(&self, request: &Request) -> reqwest::RequestBuilder {
            let method = match request.method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Patch => reqwest::Method::PATCH,
                Method::Delete => reqwest::Method::DELETE,
                Method::Head => reqwest::Method::HEAD,
            };
            let mut builder = self.client.request(method, &request.url);
            for (key, value) in self.options.headers.iter().chain(&request.headers) {
                builder = builder.header(key, value);
            }
            builder
        }

        async fn collect(response: reqwest::Response) -> RawResponse<ClientError> {
            let meta = response_meta(&response);
            match response.bytes().await {
                Ok(body) => RawTransfer::completed(body, meta),
                Err(e) => RawTransfer::interrupted(meta, e.into()),
            }
        }

        async fn stage(
            &self,
            response: reqwest::Response,
            session: &SessionDelegate,
        ) -> Result<PathBuf, ClientError> {
            let dir = self.options.resolved_download_dir();
            tokio::fs::create_dir_all(&dir).await?;

            // Dropping the temp path before `keep` removes a partial download.
            let (file, staged) = tempfile::Builder::new()
                .prefix("download-")
                .tempfile_in(&dir)?
                .into_parts();
            let mut file = tokio::fs::File::from_std(file);

            let expected = response.content_length();
            let mut written = 0u64;
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                written += chunk.len() as u64;
                session.did_write_data(chunk.len() as u64, written, expected);
            }
            file.flush().await?;
            file.sync_all().await?;
            drop(file);

            let location = staged.keep().map_err(|e| ClientError::Stage(e.error))?;
            session.did_finish_downloading(&location);
            Ok(location)
        }
    }

    impl HttpClient for ReqwestClient {
        type Error = ClientError;

        async fn data(&self, request: &Request, _session: &SessionDelegate) -> RawResponse<Self::Error> {
            let mut builder = self.prepare(request);
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }
            match builder.send().await {
                Ok(response) => Self::collect(response).await,
                Err(e) => RawTransfer::failed(e.into()),
            }
        }

        async fn upload(&self, request: &Request, session: &SessionDelegate) -> RawResponse<Self::Error> {
            let mut builder = self.prepare(request);
            match session.need_new_body_stream() {
                Some(Ok(stream)) => {
                    let expected = session.payload_len();
                    let reporter = session.clone();
                    let mut sent = 0u64;
                    let stream = stream.inspect(move |chunk| {
                        if let Ok(chunk) = chunk {
                            sent += chunk.len() as u64;
                            reporter.did_send_body_data(chunk.len() as u64, sent, expected);
                        }
                    });
                    if let Some(len) = expected {
                        builder = builder.header(reqwest::header::CONTENT_LENGTH, len);
                    }
                    builder = builder.body(reqwest::Body::wrap_stream(stream));
                }
                Some(Err(e)) => return RawTransfer::failed(ClientError::Body(e)),
                None => return RawTransfer::failed(ClientError::MissingBody),
            }
            match builder.send().await {
                Ok(response) => Self::collect(response).await,
                Err(e) => RawTransfer::failed(e.into()),
            }
        }

        async fn download(&self, request: &Request, session: &SessionDelegate) -> RawDownload<Self::Error> {
            let mut builder = self.prepare(request);
            if let Some(body) = &request.body {
                builder = builder.body(body.clone());
            }
            let response = match builder.send().await {
                Ok(response) => response,
                Err(e) => return RawTransfer::failed(e.into()),
            };
            let meta = response_meta(&response);
            match self.stage(response, session).await {
                Ok(location) => RawTransfer::completed(location, meta),
                Err(e) => RawTransfer::interrupted(meta, e),
            }
        }
    }

    fn response_meta(response: &reqwest::Response) -> ResponseMeta {
        response
            .headers()
            .iter()
            .filter_map(|(key, value)| Some((key.as_str(), value.to_str().ok()?)))
            .fold(
                ResponseMeta::new(response.status().as_u16(), response.url().as_str()),
                |meta, (key, value)| meta.with_header(key, value),
            )
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use std::time::Duration;

        #[test]
        fn test_client_from_options() {
            let options = ClientOptions::default()
                .timeout(Duration::from_secs(5))
                .user_agent("parsekit-tests")
                .header("X-Parse-Application-Id", "app");
            let client = ReqwestClient::with_options(options).unwrap();
            assert_eq!(client.options().timeout, Duration::from_secs(5));
            assert_eq!(client.options().headers.len(), 1);
        }

        #[test]
        fn test_client_error_messages() {
            let stage = ClientError::from(io::Error::new(io::ErrorKind::StorageFull, "disk full"));
            assert_eq!(stage.to_string(), "unable to stage download");
            let body = ClientError::Body(io::Error::new(io::ErrorKind::NotFound, "gone"));
            assert!(std::error::Error::source(&body).is_some());
        }

        #[tokio::test]
        async fn test_upload_without_payload_is_rejected_locally() {
            let client = ReqwestClient::new().unwrap();
            let request = Request::post("http://127.0.0.1:1/files/a.txt").body("ignored");
            let raw = client.upload(&request, &SessionDelegate::default()).await;
            assert!(raw.response.is_none());
            assert!(matches!(raw.error, Some(ClientError::MissingBody)));
        }

        #[tokio::test]
        async fn test_unreachable_host_is_transport_failure() {
            let options = ClientOptions::default().connect_timeout(Duration::from_millis(200));
            let client = ReqwestClient::with_options(options).unwrap();
            let raw = client
                .data(&Request::get("http://127.0.0.1:1/classes/Foo"), &SessionDelegate::default())
                .await;
            assert!(raw.payload.is_none());
            assert!(raw.response.is_none());
            assert!(matches!(raw.error, Some(ClientError::Http(_))));
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::{ClientError, ReqwestClient};
