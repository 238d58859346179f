//! Recursive file discovery under the target folder

use crate::error::{MoveError, Result};
use crate::error_helpers::folder_error;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// List every regular file under `root`, depth-first
///
/// Symlinks are neither followed nor returned. Entries are sorted by name within
/// each directory. Any unreadable directory aborts the listing.
pub fn list_files(root: &Path) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(root).map_err(|e| io_error(root, &e))?;
    if !metadata.is_dir() {
        let err = io::Error::new(io::ErrorKind::NotADirectory, "not a directory");
        return Err(io_error(root, &err));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            match e.io_error() {
                Some(io_err) => io_error(&path, io_err),
                None => MoveError::Io {
                    message: format!("Cannot read folder: '{}': {}", path.display(), e),
                    path,
                },
            }
        })?;

        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }

    debug!(root = %root.display(), count = files.len(), "enumerated files");
    Ok(files)
}

fn io_error(path: &Path, err: &io::Error) -> MoveError {
    MoveError::Io {
        path: path.to_path_buf(),
        message: folder_error(path, err),
    }
}
