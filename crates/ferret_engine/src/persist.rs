use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// `<path>.part`, the file a download is written to until it completes.
pub fn part_path(local_path: &Path) -> PathBuf {
    let mut name = OsString::from(local_path.as_os_str());
    name.push(".part");
    PathBuf::from(name)
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Creates (or truncates) the temporary file, creating its directory first.
pub fn create_part_file(tmp_path: &Path) -> Result<File, PersistError> {
    if let Some(dir) = tmp_path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        ensure_output_dir(dir)?;
    }
    Ok(File::create(tmp_path)?)
}

/// Moves a completed download into place with a single rename.
pub fn commit_part(tmp_path: &Path, local_path: &Path) -> Result<(), PersistError> {
    fs::rename(tmp_path, local_path)?;
    Ok(())
}
