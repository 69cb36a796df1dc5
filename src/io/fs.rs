use crate::error::{MatterFixError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use walkdir::WalkDir;

pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|s| s == "md")
        .unwrap_or(false)
}

/// Every `.md` file under `root`, in file-name order at each level.
///
/// Fails when `root` is missing; unreadable entries below it abort the walk.
pub fn resolve_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MatterFixError::root_not_found(root));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_markdown(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Immediate subdirectories of `dir` in name order, skipping dot-prefixed names.
///
/// Symlinks to directories count as directories.
pub fn child_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        if entry.path().is_dir() {
            dirs.push(entry.into_path());
        }
    }
    Ok(dirs)
}

pub fn read_to_string(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MatterFixError::file_access(path, e))
}

/// Replace the contents of `path` by writing a sibling temp file and renaming it over.
pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp_file =
        NamedTempFile::new_in(parent_dir).map_err(|e| MatterFixError::file_access(path, e))?;
    temp_file
        .write_all(content.as_bytes())
        .and_then(|_| temp_file.flush())
        .map_err(|e| MatterFixError::file_access(path, e))?;

    let original_permissions = fs::metadata(path).map(|m| m.permissions()).ok();
    temp_file
        .persist(path)
        .map_err(|e| MatterFixError::file_access(path, e.error))?;
    if let Some(permissions) = original_permissions {
        fs::set_permissions(path, permissions).map_err(|e| MatterFixError::file_access(path, e))?;
    }
    Ok(())
}
