use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to copy {} to {}: {source}", from.display(), to.display())]
    Copy {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to move {} to {}: {source}", from.display(), to.display())]
    Move {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to remove {}: {source}", path.display())]
    Remove { path: PathBuf, source: io::Error },

    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("destination already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("staging root is unavailable: no application identifier configured")]
    RootUnavailable,

    #[error("filesystem worker failed: {0}")]
    Queue(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn remove(path: &Path, source: io::Error) -> Self {
        Self::Remove {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn copy(from: &Path, to: &Path, source: io::Error) -> Self {
        Self::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }

    pub(crate) fn relocate(from: &Path, to: &Path, source: io::Error) -> Self {
        Self::Move {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        }
    }

    /// `NotFound` when the source is missing, `other(source)` for any other failure.
    pub(crate) fn missing_or(path: &Path, source: io::Error, other: impl FnOnce(io::Error) -> Self) -> Self {
        match source.kind() {
            io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => other(source),
        }
    }

    /// `AlreadyExists` when the destination is taken, `other(source)` for any other failure.
    pub(crate) fn taken_or(path: &Path, source: io::Error, other: impl FnOnce(io::Error) -> Self) -> Self {
        match source.kind() {
            io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => other(source),
        }
    }

    /// The underlying I/O error kind, if this failure came from the OS.
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::CreateDir { source, .. }
            | Self::Write { source, .. }
            | Self::Read { source, .. }
            | Self::Copy { source, .. }
            | Self::Move { source, .. }
            | Self::Remove { source, .. } => Some(source.kind()),
            Self::NotFound(_) => Some(io::ErrorKind::NotFound),
            Self::AlreadyExists(_) => Some(io::ErrorKind::AlreadyExists),
            Self::RootUnavailable | Self::Queue(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_carries_path_and_source() {
        let err = Error::write(
            Path::new("/tmp/staged.json"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let message = err.to_string();
        assert!(message.contains("/tmp/staged.json"));
        assert!(message.contains("denied"));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_precondition_kinds() {
        assert_eq!(
            Error::AlreadyExists(PathBuf::from("a")).io_kind(),
            Some(io::ErrorKind::AlreadyExists)
        );
        assert_eq!(Error::RootUnavailable.io_kind(), None);
    }

    #[test]
    fn test_only_not_found_becomes_missing() {
        let path = Path::new("/staged/a");
        let missing = Error::missing_or(path, io::Error::from(io::ErrorKind::NotFound), |e| {
            Error::copy(path, path, e)
        });
        assert!(matches!(missing, Error::NotFound(_)));

        let denied = Error::missing_or(path, io::Error::from(io::ErrorKind::PermissionDenied), |e| {
            Error::relocate(path, path, e)
        });
        assert!(matches!(denied, Error::Move { .. }));
        assert_eq!(denied.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_only_already_exists_becomes_taken() {
        let path = Path::new("/staged/b");
        let taken = Error::taken_or(path, io::Error::from(io::ErrorKind::AlreadyExists), |e| {
            Error::copy(path, path, e)
        });
        assert!(matches!(taken, Error::AlreadyExists(_)));

        let full = Error::taken_or(path, io::Error::from(io::ErrorKind::StorageFull), |e| {
            Error::copy(path, path, e)
        });
        assert_eq!(full.io_kind(), Some(io::ErrorKind::StorageFull));
    }
}
