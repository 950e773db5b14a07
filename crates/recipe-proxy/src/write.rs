//! Atomic replacement of the rendered configuration file.
//!
//! The proxy must never observe a half-written file, so content goes to a
//! `NamedTempFile` in the destination directory, is fsynced, and is then
//! renamed over the destination. On any failure the temp file is dropped
//! (and removed) and the previous destination, if any, is left untouched.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ProxyError;

/// Mode for the rendered config: readable by proxy workers, writable by root.
#[cfg(unix)]
const RENDERED_MODE: u32 = 0o644;

fn write_error(path: &Path, detail: impl Into<String>) -> ProxyError {
    ProxyError::Write {
        path: path.to_path_buf(),
        detail: detail.into(),
    }
}

/// Write `contents` to `path` via temp file + fsync + rename.
///
/// The destination directory must already exist.
///
/// # Errors
///
/// Returns `ProxyError::Write` if the directory is missing or unwritable, or
/// any of the write, sync, or rename steps fail.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), ProxyError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(write_error(
            path,
            format!("directory '{}' does not exist", dir.display()),
        ));
    }

    let mut temp = NamedTempFile::new_in(dir).map_err(|e| {
        write_error(path, format!("cannot create temp file in {}: {e}", dir.display()))
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(fs::Permissions::from_mode(RENDERED_MODE))
            .map_err(|e| write_error(path, format!("cannot set permissions: {e}")))?;
    }

    temp.write_all(contents.as_bytes())
        .map_err(|e| write_error(path, format!("cannot write temp file: {e}")))?;
    temp.as_file()
        .sync_all()
        .map_err(|e| write_error(path, format!("cannot sync temp file: {e}")))?;

    temp.persist(path)
        .map_err(|e| write_error(path, format!("cannot move temp file into place: {e}")))?;

    tracing::debug!(path = %path.display(), bytes = contents.len(), "rendered config written");
    Ok(())
}
