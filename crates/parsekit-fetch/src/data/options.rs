use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Configuration for an HTTP client.
///
/// Timeouts surface as ordinary transport failures; nothing is retried.
///
/// # Examples
///
/// ```
/// use parsekit_fetch::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::default()
///     .timeout(Duration::from_secs(30))
///     .header("X-Parse-Application-Id", "app")
///     .download_dir("/tmp/downloads");
/// assert_eq!(options.headers.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Total time allowed for one request, body included.
    ///
    /// Default: 60s
    pub timeout: Duration,

    /// Time allowed to establish the connection.
    ///
    /// Default: 10s
    pub connect_timeout: Duration,

    /// Headers sent with every request, before the request's own headers.
    ///
    /// Default: empty
    pub headers: Arc<[(String, String)]>,

    /// Default: None (the HTTP library's own user agent)
    pub user_agent: Option<String>,

    /// Directory receiving downloaded bodies.
    ///
    /// Default: None (the system temporary directory)
    pub download_dir: Option<PathBuf>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout:         Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            headers:         Arc::new([]),
            user_agent:      None,
            download_dir:    None,
        }
    }
}

impl ClientOptions {
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Add a single default header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut headers: Vec<_> = self.headers.iter().cloned().collect();
        headers.push((key.into(), value.into()));
        self.headers = Arc::from(headers);
        self
    }

    /// Replace all default headers.
    #[must_use]
    pub fn headers(mut self, headers: Vec<(String, String)>) -> Self {
        self.headers = Arc::from(headers);
        self
    }

    #[must_use]
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    #[must_use]
    pub fn download_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.download_dir = Some(dir.into());
        self
    }

    /// The effective download directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        self.download_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
