use crate::{Error, Result};
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

/// Copy a file or directory tree to a destination that must not exist yet.
///
/// The destination is claimed with an exclusive create, so when two copies
/// race to the same destination exactly one of them succeeds.
pub fn copy_item(from: impl AsRef<Path>, to: impl AsRef<Path>) -> Result<()> {
    let from = from.as_ref();
    let to = to.as_ref();

    let metadata =
        fs::symlink_metadata(from).map_err(|e| Error::missing_or(from, e, |e| Error::copy(from, to, e)))?;

    if metadata.is_dir() {
        fs::create_dir(to).map_err(|e| {
            Error::taken_or(to, e, |source| Error::CreateDir {
                path: to.to_path_buf(),
                source,
            })
        })?;
        copy_dir_contents(from, to).inspect_err(|_| {
            let _ = fs::remove_dir_all(to);
        })
    } else {
        copy_entry(from, to, metadata.file_type())
            .map_err(|e| Error::taken_or(to, e, |e| Error::copy(from, to, e)))
    }
}

/// Copy everything inside `src` into the existing directory `dest`.
///
/// Entries are created exclusively; an entry already present in `dest` fails
/// the copy.
pub(crate) fn copy_dir_contents(src: &Path, dest: &Path) -> Result<()> {
    for entry in fs::read_dir(src).map_err(|e| Error::read(src, e))? {
        let entry = entry.map_err(|e| Error::read(src, e))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        let file_type = entry.file_type().map_err(|e| Error::read(&src_path, e))?;

        if file_type.is_dir() {
            fs::create_dir(&dest_path).map_err(|e| {
                Error::taken_or(&dest_path, e, |source| Error::CreateDir {
                    path: dest_path.clone(),
                    source,
                })
            })?;
            copy_dir_contents(&src_path, &dest_path)?;
        } else {
            copy_entry(&src_path, &dest_path, file_type)
                .map_err(|e| Error::taken_or(&dest_path, e, |e| Error::copy(&src_path, &dest_path, e)))?;
        }
    }
    Ok(())
}

/// Copy a single non-directory entry, failing with `AlreadyExists` if `to` is taken.
pub(crate) fn copy_entry(from: &Path, to: &Path, file_type: fs::FileType) -> io::Result<()> {
    #[cfg(unix)]
    if file_type.is_symlink() {
        let target = fs::read_link(from)?;
        return std::os::unix::fs::symlink(target, to);
    }
    #[cfg(not(unix))]
    let _ = file_type;

    let mut source = File::open(from)?;
    let mut dest = OpenOptions::new().write(true).create_new(true).open(to)?;
    if let Err(e) = fill(&mut source, &mut dest) {
        drop(dest);
        let _ = fs::remove_file(to);
        return Err(e);
    }
    Ok(())
}

fn fill(source: &mut File, dest: &mut File) -> io::Result<()> {
    io::copy(source, dest)?;
    dest.set_permissions(source.metadata()?.permissions())
}
