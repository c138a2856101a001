//! Save the current synthesis result under a fixed file name.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::app_dirs::{self, AppDirError};
use crate::atomic_file;
use crate::audio::AudioClip;

/// Name given to every downloaded clip.
pub const DOWNLOAD_FILE_NAME: &str = "yov-audio.wav";

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("No audio to download")]
    NoClip,
    #[error(transparent)]
    Directory(#[from] AppDirError),
    #[error("Failed to create download folder {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to save audio to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Pick the download folder: the configured one, else the OS default.
pub fn resolve_download_dir(configured: Option<&Path>) -> Result<PathBuf, DownloadError> {
    match configured {
        Some(dir) => Ok(dir.to_path_buf()),
        None => Ok(app_dirs::default_download_dir()?),
    }
}

/// Write the clip bytes to `<dir>/yov-audio.wav`, replacing any previous download.
pub fn save_clip(clip: &AudioClip, dir: &Path) -> Result<PathBuf, DownloadError> {
    if clip.is_empty() {
        return Err(DownloadError::NoClip);
    }
    std::fs::create_dir_all(dir).map_err(|source| DownloadError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    let path = dir.join(DOWNLOAD_FILE_NAME);
    atomic_file::atomic_write(&path, clip.as_slice()).map_err(|source| DownloadError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = clip.len(), "Saved synthesized audio");
    Ok(path)
}
