use crate::protection::Protection;
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    pub protection: Protection,
    pub sync:       bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn protection(mut self, protection: Protection) -> Self {
        self.protection = protection;
        self
    }
    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Write `content` to `path` so that readers observe either the previous file
/// or the complete new one.
///
/// The bytes land in a sibling temporary file which is renamed over `path`;
/// on any failure the temporary is discarded and `path` is untouched.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: Options) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".staged.")
        .suffix(".tmp")
        .tempfile_in(parent)
        .map_err(|e| Error::write(path, e))?;

    tmp.as_file_mut()
        .write_all(content)
        .map_err(|e| Error::write(tmp.path(), e))?;

    options.protection.apply_to_file(tmp.path())?;

    if options.sync {
        tmp.as_file()
            .sync_all()
            .map_err(|e| Error::write(tmp.path(), e))?;
    }

    tmp.persist(path).map_err(|e| Error::write(path, e.error))?;

    Ok(())
}
