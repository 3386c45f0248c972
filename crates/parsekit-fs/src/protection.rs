use crate::{Error, Result};
use std::path::Path;

/// Protection profile applied to staged directories and files.
///
/// Staged artifacts may hold session-bound backend data, so the default keeps
/// them readable by the owning user only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Protection {
    /// Owner-only access.
    ///
    /// On Unix: directories `0o700`, files `0o600`
    /// On Windows: no-op, the user profile ACLs already apply
    #[default]
    OwnerOnly,

    /// No explicit mode is applied.
    Inherit,
}

impl Protection {
    /// Unix mode bits for directories, `None` when the platform default is kept.
    pub fn directory_mode(self) -> Option<u32> {
        match self {
            Self::OwnerOnly => Some(0o700),
            Self::Inherit => None,
        }
    }

    /// Unix mode bits for regular files, `None` when the platform default is kept.
    pub fn file_mode(self) -> Option<u32> {
        match self {
            Self::OwnerOnly => Some(0o600),
            Self::Inherit => None,
        }
    }

    /// Apply the file profile to an existing path.
    ///
    /// # Errors
    /// Returns an error if the path does not exist or permissions cannot be set.
    pub fn apply_to_file(self, path: &Path) -> Result<()> {
        #[cfg(unix)]
        if let Some(mode) = self.file_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode))
                .map_err(|e| Error::write(path, e))?;
        }
        #[cfg(not(unix))]
        let _ = path;
        Ok(())
    }

    /// Create `path` and any missing ancestors with the directory profile.
    ///
    /// Only directories created by this call receive the profile; existing
    /// ancestors are left untouched.
    pub fn create_dir_all(self, path: &Path) -> Result<()> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        if let Some(mode) = self.directory_mode() {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        builder.create(path).map_err(|e| Error::CreateDir {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
