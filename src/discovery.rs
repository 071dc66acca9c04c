use crate::error::{PipelineError, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// What a path points at, following symlinks the way `stat` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Other,
    NotFound,
}

pub fn entry_kind(path: &Path) -> EntryKind {
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => EntryKind::File,
        Ok(meta) if meta.is_dir() => EntryKind::Directory,
        Ok(_) => EntryKind::Other,
        Err(e) if e.kind() == io::ErrorKind::NotFound => EntryKind::NotFound,
        // Dangling links and permission errors are not candidates either way.
        Err(_) => EntryKind::Other,
    }
}

/// Case-insensitive check that `file_name` ends with `.{extension}`.
///
/// `IMAGE.PNG` matches `png`; `image.pngx` does not.
pub fn has_extension(file_name: &str, extension: &str) -> bool {
    let name = file_name.as_bytes();
    let ext = extension.as_bytes();
    if name.len() < ext.len() + 1 {
        return false;
    }
    let dot = name.len() - ext.len() - 1;
    name[dot] == b'.' && name[dot + 1..].eq_ignore_ascii_case(ext)
}

/// Lists the regular files directly inside `directory` whose names end with
/// `extension`.
///
/// Entries come back in filesystem enumeration order. Subdirectories are
/// skipped, never descended into.
pub fn discover(directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    if entry_kind(directory) != EntryKind::Directory {
        return Err(PipelineError::Configuration(format!(
            "folder not found: {}",
            directory.display()
        )));
    }

    let mut candidates = Vec::new();
    for entry in WalkDir::new(directory).min_depth(1).max_depth(1) {
        let entry = entry?;
        let path = entry.path();

        let matches_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(|name| has_extension(name, extension))
            .unwrap_or(false);

        if matches_name && entry_kind(path) == EntryKind::File {
            candidates.push(path.to_path_buf());
        } else {
            debug!("Skipping {:?}", path);
        }
    }

    Ok(candidates)
}
