use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Write `content` to `path` atomically.
///
/// The content lands in a temp file in the destination directory and is
/// renamed into place, so a failed or cancelled write never leaves a
/// truncated artifact at the final path.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let write_error = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_error)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(content.as_bytes()).map_err(write_error)?;
    tmp.persist(path).map_err(|err| write_error(err.error))?;
    Ok(())
}
