//! Symlink and directory primitives used by the store.
//!
//! Every existence check here uses `symlink_metadata`, so a dangling symlink
//! still counts as an occupied path.
use std::path::{Path, PathBuf};

use crate::error::{ConfsError, Result};

/// `true` if anything (including a dangling symlink) occupies `path`.
pub fn entry_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// `true` if `path` itself is a symlink.
pub fn is_symlink(path: &Path) -> bool {
    path.symlink_metadata()
        .map(|m| m.file_type().is_symlink())
        .unwrap_or(false)
}

/// `true` if `a` and `b` resolve to the same existing filesystem object.
pub fn same_file(a: &Path, b: &Path) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// `path` with every symlink resolved, or `None` if it dangles.
pub fn resolve(path: &Path) -> Option<PathBuf> {
    dunce::canonicalize(path).ok()
}

/// Read the literal value of the symlink at `path`.
pub fn read_link(path: &Path) -> Result<PathBuf> {
    std::fs::read_link(path).map_err(|e| ConfsError::InvalidSymlink {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Create `path` (and missing ancestors) as a directory.
pub fn create_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| ConfsError::DirectoryCreateFailed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!("created directory {}", path.display());
    Ok(())
}

/// Ensure `path` is a directory, creating it if nothing occupies it.
///
/// Fails with [`ConfsError::ExpectedDirectory`] rather than touching a file
/// that sits where the directory should be.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if path.is_dir() {
        return Ok(());
    }
    if entry_exists(path) {
        return Err(ConfsError::ExpectedDirectory(path.to_path_buf()));
    }
    create_dir(path)
}

/// Create a symlink at `link` pointing to `target`.
pub fn create_symlink(target: &Path, link: &Path) -> Result<()> {
    let failed = |source| ConfsError::SymlinkCreateFailed {
        link: link.to_path_buf(),
        target: target.to_path_buf(),
        source,
    };

    #[cfg(unix)]
    std::os::unix::fs::symlink(target, link).map_err(failed)?;

    #[cfg(windows)]
    {
        let result = if target.is_dir() {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        };
        result.map_err(failed)?;
    }

    tracing::debug!("linked {} -> {}", link.display(), target.display());
    Ok(())
}

/// Remove the symlink at `path` without touching what it points to.
///
/// Fails with [`ConfsError::ExpectedSymlink`] if `path` is not a symlink.
pub fn remove_symlink(path: &Path) -> Result<()> {
    let meta = path
        .symlink_metadata()
        .map_err(|e| ConfsError::io("inspect", path, e))?;
    if !meta.file_type().is_symlink() {
        return Err(ConfsError::ExpectedSymlink(path.to_path_buf()));
    }
    let removed = if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    };
    removed.map_err(|e| ConfsError::io("remove symlink", path, e))?;
    tracing::debug!("unlinked {}", path.display());
    Ok(())
}

/// Move `from` to `to` (same filesystem).
pub fn rename(from: &Path, to: &Path) -> Result<()> {
    std::fs::rename(from, to).map_err(|e| ConfsError::io("rename", from, e))?;
    tracing::debug!("moved {} -> {}", from.display(), to.display());
    Ok(())
}

/// Names of the entries of directory `dir`, sorted.
///
/// Names that are not valid UTF-8 are returned as `None` alongside their
/// path so callers can reject them with a domain error.
pub fn sorted_entries(dir: &Path) -> Result<Vec<(PathBuf, Option<String>)>> {
    let read = std::fs::read_dir(dir).map_err(|e| ConfsError::io("read directory", dir, e))?;
    let mut entries = Vec::new();
    for entry in read {
        let entry = entry.map_err(|e| ConfsError::io("read directory", dir, e))?;
        let name = entry.file_name().to_str().map(str::to_string);
        entries.push((entry.path(), name));
    }
    entries.sort();
    Ok(entries)
}

/// On Windows, directory symlinks must be removed with `remove_dir`; the raw
/// `FILE_ATTRIBUTE_DIRECTORY` bit tells them apart.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        let _ = meta;
        false
    }
}
