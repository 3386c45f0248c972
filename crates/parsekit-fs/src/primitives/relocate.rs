use crate::primitives::copy::{copy_dir_contents, copy_entry};
use crate::{Error, Result};
use std::fs;
use std::io;
use std::path::Path;

/// Move a file or directory to a destination that must not exist yet.
///
/// The destination is claimed before the source is released: files are
/// hard-linked (or copied exclusively when linking is impossible, e.g. across
/// devices) and then unlinked, directories are renamed onto a freshly created
/// placeholder. Of two moves racing to one destination exactly one succeeds.
pub fn move_item(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let from = from.as_ref();
    let to = to.as_ref();

    let metadata =
        fs::symlink_metadata(from).map_err(|e| Error::missing_or(from, e, |e| Error::relocate(from, to, e)))?;

    if metadata.is_dir() {
        move_dir(from, to)
    } else {
        claim_entry(from, to, metadata.file_type())
            .map_err(|e| Error::taken_or(to, e, |e| Error::relocate(from, to, e)))?;
        fs::remove_file(from).map_err(|e| Error::remove(from, e))
    }
}

fn claim_entry(from: &Path, to: &Path, file_type: fs::FileType) -> io::Result<()> {
    if file_type.is_symlink() {
        return copy_entry(from, to, file_type);
    }
    match fs::hard_link(from, to) {
        Err(e) if e.kind() != io::ErrorKind::AlreadyExists => copy_entry(from, to, file_type),
        linked => linked,
    }
}

fn move_dir(from: &Path, to: &Path) -> Result<()> {
    fs::create_dir(to).map_err(|e| {
        Error::taken_or(to, e, |source| Error::CreateDir {
            path: to.to_path_buf(),
            source,
        })
    })?;

    // Only Unix renames a directory over an empty one.
    #[cfg(not(unix))]
    let _ = fs::remove_dir(to);

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => {
            copy_dir_contents(from, to)?;
            fs::remove_dir_all(from).map_err(|e| Error::remove(from, e))
        }
        Err(e) => {
            let _ = fs::remove_dir(to);
            Err(Error::relocate(from, to, e))
        }
    }
}

fn is_cross_device(e: &io::Error) -> bool {
    e.raw_os_error() == Some(18) || e.kind() == io::ErrorKind::CrossesDevices
}

/// Remove every entry directly inside `path`, keeping `path` itself.
///
/// Stops at the first entry that cannot be removed.
pub fn remove_dir_contents(path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    let mut removed = 0;
    for entry in fs::read_dir(path).map_err(|e| Error::read(path, e))? {
        let entry = entry.map_err(|e| Error::read(path, e))?;
        remove_entry(&entry.path())?;
        removed += 1;
    }
    Ok(removed)
}

fn remove_entry(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path).map_err(|e| Error::remove(path, e))?;
    let removed = if metadata.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    };
    removed.map_err(|e| Error::remove(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn test_move_item_file() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "data").unwrap();

        move_item(&src, &dest).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"data");
    }

    #[test]
    fn test_move_item_directory() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("inner")).unwrap();
        fs::write(src.join("inner/file"), "x").unwrap();

        move_item(&src, dir.path().join("dest")).unwrap();

        assert!(!src.exists());
        assert_eq!(fs::read(dir.path().join("dest/inner/file")).unwrap(), b"x");
    }

    #[test]
    fn test_move_item_refuses_existing_destination() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        let dest = dir.path().join("b.txt");
        fs::write(&src, "new").unwrap();
        fs::write(&dest, "old").unwrap();

        assert!(matches!(move_item(&src, &dest), Err(Error::AlreadyExists(_))));
        assert!(src.exists());
        assert_eq!(fs::read(&dest).unwrap(), b"old");
    }

    #[test]
    fn test_move_directory_refuses_empty_existing_directory() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("src");
        let dest = dir.path().join("dest");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("file"), "x").unwrap();
        fs::create_dir_all(&dest).unwrap();

        assert!(matches!(move_item(&src, &dest), Err(Error::AlreadyExists(_))));
        assert!(src.join("file").exists());
        assert!(!dest.join("file").exists());
    }

    #[test]
    fn test_move_item_missing_source() {
        let dir = tempdir().unwrap();
        let result = move_item(dir.path().join("nope"), dir.path().join("dest"));
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_move_into_missing_parent_reports_io_error() {
        let dir = tempdir().unwrap();
        let src = dir.path().join("a.txt");
        fs::write(&src, "data").unwrap();

        let err = move_item(&src, dir.path().join("missing/a.txt")).unwrap_err();

        assert!(matches!(err, Error::Move { .. }));
        assert!(src.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_source_is_not_reported_missing() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::write(locked.join("a.txt"), "data").unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged users bypass permission bits.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();
            return;
        }

        let moved = move_item(locked.join("a.txt"), dir.path().join("b.txt"));
        let copied = crate::primitives::copy_item(locked.join("a.txt"), dir.path().join("c.txt"));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o700)).unwrap();

        let moved = moved.unwrap_err();
        assert!(matches!(moved, Error::Move { .. }));
        assert_eq!(moved.io_kind(), Some(io::ErrorKind::PermissionDenied));
        let copied = copied.unwrap_err();
        assert!(matches!(copied, Error::Copy { .. }));
        assert_eq!(copied.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_racing_moves_to_one_destination() {
        let dir = tempdir().unwrap();
        for round in 0..500 {
            let dest = dir.path().join(format!("dest-{round}"));
            let sources: Vec<_> = (0..2)
                .map(|i| {
                    let src = dir.path().join(format!("src-{round}-{i}"));
                    fs::write(&src, format!("writer {i}")).unwrap();
                    src
                })
                .collect();

            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = sources
                .iter()
                .cloned()
                .map(|src| {
                    let barrier = Arc::clone(&barrier);
                    let dest = dest.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        move_item(&src, &dest)
                    })
                })
                .collect();
            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1, "round {round}: {results:?}");
            let (winner, loser) = if results[0].is_ok() { (0, 1) } else { (1, 0) };
            assert!(matches!(results[loser], Err(Error::AlreadyExists(_))));
            assert!(!sources[winner].exists());
            assert!(sources[loser].exists());
            assert_eq!(fs::read_to_string(&dest).unwrap(), format!("writer {winner}"));
        }
    }

    #[test]
    fn test_racing_directory_moves_to_one_destination() {
        let dir = tempdir().unwrap();
        for round in 0..200 {
            let dest = dir.path().join(format!("dest-{round}"));
            let sources: Vec<_> = (0..2)
                .map(|i| {
                    let src = dir.path().join(format!("src-{round}-{i}"));
                    fs::create_dir(&src).unwrap();
                    fs::write(src.join(format!("from-{i}")), "x").unwrap();
                    src
                })
                .collect();

            let barrier = Arc::new(Barrier::new(2));
            let handles: Vec<_> = sources
                .iter()
                .cloned()
                .map(|src| {
                    let barrier = Arc::clone(&barrier);
                    let dest = dest.clone();
                    thread::spawn(move || {
                        barrier.wait();
                        move_item(&src, &dest)
                    })
                })
                .collect();
            let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1, "round {round}: {results:?}");
            assert_eq!(fs::read_dir(&dest).unwrap().count(), 1);
        }
    }

    #[test]
    fn test_remove_dir_contents() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a"), "1").unwrap();
        fs::create_dir_all(dir.path().join("b/c")).unwrap();

        assert_eq!(remove_dir_contents(dir.path()).unwrap(), 2);
        assert!(dir.path().is_dir());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_remove_dir_contents_empty() {
        let dir = tempdir().unwrap();
        assert_eq!(remove_dir_contents(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_remove_dir_contents_missing_dir() {
        let dir = tempdir().unwrap();
        let err = remove_dir_contents(dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
    }
}
