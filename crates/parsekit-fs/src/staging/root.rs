use crate::protection::Protection;
use crate::staging::dirs;
use std::path::{Component, Path, PathBuf};

/// Directory inserted between the base location and the application identifier.
pub const STAGING_DIRECTORY: &str = "parse";

const DEFAULT_MAX_CONCURRENCY: usize = 8;

/// Where the staging root lives.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum StorageScheme {
    /// Private per-user data directory.
    #[default]
    Private,

    /// Container shared by an application group. The container must already
    /// exist; it is never created by the manager.
    AppGroup(String),

    /// Explicit base directory.
    Directory(PathBuf),
}

/// Configuration of a [`StagingManager`](crate::StagingManager).
///
/// # Examples
///
/// ```
/// use parsekit_fs::{Protection, StagingConfig, StorageScheme};
///
/// let config = StagingConfig::new("com.example.app")
///     .scheme(StorageScheme::Directory("/var/lib/example".into()))
///     .protection(Protection::OwnerOnly)
///     .max_concurrency(4);
/// assert!(config.resolve_root().unwrap().ends_with("parse/com.example.app"));
/// ```
#[derive(Clone, Debug)]
pub struct StagingConfig {
    application_id:  String,
    scheme:          StorageScheme,
    protection:      Protection,
    max_concurrency: usize,
}

impl StagingConfig {
    pub fn new(application_id: impl Into<String>) -> Self {
        Self {
            application_id:  application_id.into(),
            scheme:          StorageScheme::default(),
            protection:      Protection::default(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    #[must_use]
    pub fn scheme(mut self, scheme: StorageScheme) -> Self {
        self.scheme = scheme;
        self
    }

    #[must_use]
    pub fn app_group(self, group_id: impl Into<String>) -> Self {
        self.scheme(StorageScheme::AppGroup(group_id.into()))
    }

    #[must_use]
    pub fn base_dir(self, dir: impl Into<PathBuf>) -> Self {
        self.scheme(StorageScheme::Directory(dir.into()))
    }

    #[must_use]
    pub fn protection(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }

    /// Upper bound on filesystem jobs running at once. Zero is treated as one.
    #[must_use]
    pub fn max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn application_id(&self) -> &str {
        &self.application_id
    }

    pub fn storage_scheme(&self) -> &StorageScheme {
        &self.scheme
    }

    pub fn get_protection(&self) -> Protection {
        self.protection
    }

    pub fn get_max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Compute the staging root: `<base>/parse/<application id>`.
    ///
    /// Returns `None` when the application identifier is blank, the base
    /// directory cannot be determined, or an application group container is
    /// missing. Pure path arithmetic apart from that existence probe; nothing
    /// is created and nothing is cached.
    pub fn resolve_root(&self) -> Option<PathBuf> {
        let application_id = self.application_id.trim();
        let mut components = Path::new(application_id).components();
        if !matches!(components.next(), Some(Component::Normal(_))) || components.next().is_some() {
            return None;
        }

        let base = match &self.scheme {
            StorageScheme::Private => dirs::user_data()?,
            StorageScheme::AppGroup(group) => dirs::group_container(group).filter(|p| p.is_dir())?,
            StorageScheme::Directory(dir) => dir.clone(),
        };

        let root = base.join(STAGING_DIRECTORY).join(application_id);
        std::path::absolute(root).ok()
    }
}
