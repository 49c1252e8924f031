//! File access for save images.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};

use crate::error::{CoreError, CoreResult};
use crate::version::TOTAL_FILE_SIZE;

/// Reads a save image, rejecting files whose length is not exactly
/// [`TOTAL_FILE_SIZE`] before any parsing.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_save_file(path: &Path) -> CoreResult<Vec<u8>> {
    let found = fs::metadata(path)?.len() as usize;
    if found != TOTAL_FILE_SIZE {
        return Err(CoreError::InvalidFileSize { found });
    }
    let bytes = fs::read(path)?;
    if bytes.len() != TOTAL_FILE_SIZE {
        return Err(CoreError::InvalidFileSize { found: bytes.len() });
    }
    debug!(len = bytes.len(), "read save image");
    Ok(bytes)
}

/// Replaces `path` through a sibling temporary file. With `backup` set the
/// previous contents are copied to `<path>.bak` first; a failed copy is
/// logged and does not stop the write.
#[instrument(skip_all, fields(path = %path.display(), len = bytes.len(), backup = backup))]
pub fn write_save_file(path: &Path, bytes: &[u8], backup: bool) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    if backup && path.exists() {
        let backup = backup_path(path);
        if let Err(err) = fs::copy(path, &backup) {
            warn!(backup = %backup.display(), error = %err, "could not back up save file");
        }
    }
    let tmp_path = sibling_path(path, ".tmp");
    let replaced = fs::write(&tmp_path, bytes).and_then(|()| {
        if path.exists() {
            fs::remove_file(path)?;
        }
        fs::rename(&tmp_path, path)
    });
    if let Err(err) = replaced {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            debug!(tmp = %tmp_path.display(), error = %cleanup, "temporary save not removed");
        }
        return Err(err.into());
    }
    Ok(())
}

pub fn backup_path(path: &Path) -> PathBuf {
    sibling_path(path, ".bak")
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut output = path.as_os_str().to_os_string();
    output.push(suffix);
    PathBuf::from(output)
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
