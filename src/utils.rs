use crate::error::Error;
use crate::result::Result;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Fail with `unable to find <path>` unless `path` is a regular file
pub fn verify_file_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }
    Ok(())
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Package name is the last normal component of the package directory path.
/// Trailing separators and `.` components are ignored.
pub fn package_name(dir: &Path) -> Result<String> {
    match dir.components().rev().find(|c| !matches!(c, Component::CurDir)) {
        Some(Component::Normal(name)) => name
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| Error::InvalidPackageName(dir.to_path_buf())),
        _ => Err(Error::InvalidPackageName(dir.to_path_buf())),
    }
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
