//! A single managed file or directory inside a variant.
//!
//! Three paths describe a managed file:
//!
//! - `content_path` (`<variant>/<name>`) holds the real content;
//! - `live_path` is where the content is installed, e.g. `~/.vimrc`;
//! - `pointer_path` (`<variant>/targets/<name>`) is a symlink whose value is
//!   `live_path`. It is bookkeeping only and is written whether or not the
//!   live path exists.
//!
//! "Installed" is never stored: it holds when `live_path` is a symlink that
//! resolves to `content_path`.
use std::path::{Path, PathBuf};

use super::fs;
use crate::config::{Config, expand_tilde};
use crate::error::{ConfsError, Result};

/// One file or directory under management.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagedFile {
    name: String,
    live_path: PathBuf,
    content_path: PathBuf,
    pointer_path: PathBuf,
    pending_delete: bool,
}

impl ManagedFile {
    /// Describe a managed file named `name` in the variant at `variant_path`.
    ///
    /// Nothing is written until [`save`](Self::save).
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        live_path: impl Into<PathBuf>,
        variant_path: &Path,
        config: &Config,
    ) -> Self {
        let name = name.into();
        Self {
            content_path: variant_path.join(&name),
            pointer_path: variant_path.join(&config.targets_dir_name).join(&name),
            live_path: live_path.into(),
            name,
            pending_delete: false,
        }
    }

    /// Load a managed file from its pointer symlink.
    ///
    /// The live path is the literal link value, not a resolved path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidTargetPath`] if the entry has no usable
    /// name and [`ConfsError::ExpectedSymlink`] if it is not a symlink.
    pub fn from_pointer(pointer_path: &Path, variant_path: &Path) -> Result<Self> {
        let name = pointer_path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfsError::InvalidTargetPath {
                path: pointer_path.to_path_buf(),
                reason: "a target needs a non-empty UTF-8 file name".to_string(),
            })?;
        if !fs::is_symlink(pointer_path) {
            return Err(ConfsError::ExpectedSymlink(pointer_path.to_path_buf()));
        }
        let live_path = fs::read_link(pointer_path)?;

        Ok(Self {
            name: name.to_string(),
            content_path: variant_path.join(name),
            pointer_path: pointer_path.to_path_buf(),
            live_path,
            pending_delete: false,
        })
    }

    /// Name of the managed file, unique within its variant.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the content is installed, exactly as recorded.
    #[must_use]
    pub fn live_path(&self) -> &Path {
        &self.live_path
    }

    /// Where the real content lives inside the store.
    #[must_use]
    pub fn content_path(&self) -> &Path {
        &self.content_path
    }

    /// The bookkeeping symlink recording [`live_path`](Self::live_path).
    #[must_use]
    pub fn pointer_path(&self) -> &Path {
        &self.pointer_path
    }

    /// The live path with a leading `~` expanded, as used on the filesystem.
    #[must_use]
    pub fn install_path(&self) -> PathBuf {
        expand_tilde(&self.live_path)
    }

    /// `true` if the content exists in the store.
    #[must_use]
    pub fn has_content(&self) -> bool {
        fs::entry_exists(&self.content_path)
    }

    /// `true` once [`mark_for_deletion`](Self::mark_for_deletion) was called.
    #[must_use]
    pub const fn is_pending_delete(&self) -> bool {
        self.pending_delete
    }

    /// Make the next [`save`](Self::save) remove the pointer symlink.
    ///
    /// The caller still has to drop the entry from its variant.
    pub const fn mark_for_deletion(&mut self) {
        self.pending_delete = true;
    }

    /// Write the pointer symlink, or remove it if pending deletion.
    ///
    /// A pointer that already records the live path is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::ExpectedSymlink`] if a regular file or directory
    /// occupies the pointer path, or a filesystem error.
    pub fn save(&self) -> Result<()> {
        let pointer = &self.pointer_path;

        if self.pending_delete {
            if fs::is_symlink(pointer) {
                fs::remove_symlink(pointer)?;
            } else if fs::entry_exists(pointer) {
                return Err(ConfsError::ExpectedSymlink(pointer.clone()));
            }
            tracing::debug!("deleted target {} at {}", self.name, pointer.display());
            return Ok(());
        }

        if fs::is_symlink(pointer) {
            if fs::read_link(pointer)? == self.live_path {
                return Ok(());
            }
            fs::remove_symlink(pointer)?;
        } else if fs::entry_exists(pointer) {
            return Err(ConfsError::ExpectedSymlink(pointer.clone()));
        }
        fs::create_symlink(&self.live_path, pointer)
    }

    /// Symlink the live path to the content path.
    ///
    /// An existing symlink at the live path is replaced; anything else is
    /// left alone and reported. The content does not have to exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::ExpectedSymlink`] if real data occupies the
    /// live path, or a filesystem error.
    pub fn install(&self) -> Result<()> {
        let live = self.install_path();
        if fs::is_symlink(&live) {
            fs::remove_symlink(&live)?;
        } else if fs::entry_exists(&live) {
            return Err(ConfsError::ExpectedSymlink(live));
        }

        if let Some(parent) = live.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::ensure_dir(parent)?;
        }

        let content = std::path::absolute(&self.content_path)
            .map_err(|e| ConfsError::io("resolve", &self.content_path, e))?;
        fs::create_symlink(&content, &live)
    }

    /// `true` if the live path is a symlink resolving to the content path.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        let live = self.install_path();
        fs::is_symlink(&live) && fs::same_file(&live, &self.content_path)
    }

    /// Remove the install symlink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidOperation`] if the live path is not a
    /// symlink, and [`ConfsError::InconsistentData`] if it is a symlink that
    /// resolves somewhere other than the content path. The live path is not
    /// touched in either case.
    pub fn uninstall(&self) -> Result<()> {
        let live = self.install_path();
        if !fs::is_symlink(&live) {
            return Err(ConfsError::InvalidOperation(format!(
                "target '{}' is not installed at {}",
                self.name,
                live.display()
            )));
        }
        if !fs::same_file(&live, &self.content_path) {
            return Err(ConfsError::InconsistentData(format!(
                "{} does not point to {}; refusing to remove it",
                live.display(),
                self.content_path.display()
            )));
        }
        fs::remove_symlink(&live)
    }
}
