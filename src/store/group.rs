//! A configuration group: a directory of variants plus the `enabled` link.
use std::path::{Path, PathBuf};

use super::fs;
use super::variant::Variant;
use crate::config::Config;
use crate::error::{ConfsError, Result};

/// One logical configuration (e.g. `vim`) and its variants.
///
/// `enabled` is a name handle into `variants`; it is only ever set to the
/// name of a variant present in the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigGroup {
    name: String,
    path: PathBuf,
    variants: Vec<Variant>,
    enabled: Option<String>,
}

impl ConfigGroup {
    /// A new, empty group inside `store_root`.
    #[must_use]
    pub fn new(name: impl Into<String>, store_root: &Path) -> Self {
        let name = name.into();
        Self {
            path: store_root.join(&name),
            name,
            variants: Vec::new(),
            enabled: None,
        }
    }

    /// Load the group at `path` with all of its variants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::MissingEnabledLink`] if the group has no
    /// enabled link, [`ConfsError::ExpectedSymlink`] if it is not a symlink,
    /// or the first error raised while loading a variant.
    pub fn load(path: &Path, config: &Config) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfsError::InvalidGroupName {
                name: path.display().to_string(),
                reason: "a group needs a non-empty UTF-8 directory name".to_string(),
            })?
            .to_string();

        let link = path.join(&config.enabled_link_name);
        if !fs::entry_exists(&link) {
            return Err(ConfsError::MissingEnabledLink(link));
        }
        if !fs::is_symlink(&link) {
            return Err(ConfsError::ExpectedSymlink(link));
        }
        let enabled_target = fs::read_link(&link)?;
        // A chain of links names the directory at its end; a dangling link
        // falls back to its own value.
        let enabled_name = fs::resolve(&link)
            .unwrap_or_else(|| enabled_target.clone())
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string);

        let mut variants = Vec::new();
        for (entry, entry_name) in fs::sorted_entries(path)? {
            let Some(entry_name) = entry_name else {
                return Err(ConfsError::InvalidVariantName {
                    group: name,
                    variant: entry.display().to_string(),
                    reason: "variant directory name is not valid UTF-8".to_string(),
                });
            };
            if config.is_excluded_variant(&entry_name) || !entry.is_dir() {
                continue;
            }
            variants.push(Variant::load(&entry, config)?);
        }

        let enabled = enabled_name.filter(|e| variants.iter().any(|v| v.name() == e));
        if enabled.is_none() {
            tracing::debug!(
                "enabled link of {name} points to {}, which is not a variant",
                enabled_target.display()
            );
        }

        Ok(Self {
            name,
            path: path.to_path_buf(),
            variants,
            enabled,
        })
    }

    /// Name of the group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of the group.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Variants in load/insertion order.
    #[must_use]
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    /// The enabled variant, if any.
    #[must_use]
    pub fn enabled(&self) -> Option<&Variant> {
        let name = self.enabled.as_deref()?;
        self.variants.iter().find(|v| v.name() == name)
    }

    /// Look up a variant by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidVariantName`] if there is none.
    pub fn variant(&self, name: &str) -> Result<&Variant> {
        self.variants
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| self.variant_error(name, "no such variant"))
    }

    /// Look up a variant by name for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidVariantName`] if there is none.
    pub fn variant_mut(&mut self, name: &str) -> Result<&mut Variant> {
        let error = self.variant_error(name, "no such variant");
        self.variants
            .iter_mut()
            .find(|v| v.name() == name)
            .ok_or(error)
    }

    /// Add a new, empty variant. Nothing is written until [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidVariantName`] for an empty, reserved or
    /// duplicate name.
    pub fn create_variant(&mut self, name: &str, config: &Config) -> Result<&mut Variant> {
        let reason = if name.is_empty() {
            Some("name is empty")
        } else if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            Some("name must not contain a path separator")
        } else if name == "." || name == ".." || config.is_excluded_variant(name) {
            Some("name is reserved")
        } else if self.variants.iter().any(|v| v.name() == name) {
            Some("variant already exists")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(self.variant_error(name, reason));
        }

        self.variants.push(Variant::new(name, &self.path));
        self.variant_mut(name)
    }

    /// Mark `name` as the enabled variant. Nothing is written until
    /// [`Self::save`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidVariantName`] if there is no such variant.
    pub fn enable_variant(&mut self, name: &str) -> Result<()> {
        self.variant(name)?;
        self.enabled = Some(name.to_string());
        Ok(())
    }

    /// Write the group to disk: its directory, every variant, and the
    /// enabled link.
    ///
    /// The enabled link is only touched when it does not already point at
    /// the enabled variant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidGroupName`] for an excluded or malformed
    /// name, [`ConfsError::ExpectedSymlink`] if a non-symlink occupies the
    /// enabled link, or the first error raised while saving a variant.
    pub fn save(&self, config: &Config) -> Result<()> {
        let reason = if self.name.is_empty() {
            Some("name is empty")
        } else if self.name.contains('/') || self.name.contains(std::path::MAIN_SEPARATOR) {
            Some("name must not contain a path separator")
        } else if config.is_excluded_group(&self.name) {
            Some("name is excluded from the store")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(ConfsError::InvalidGroupName {
                name: self.name.clone(),
                reason: reason.to_string(),
            });
        }

        fs::ensure_dir(&self.path)?;
        for variant in &self.variants {
            variant.save(config)?;
        }
        self.save_enabled_link(config)
    }

    fn save_enabled_link(&self, config: &Config) -> Result<()> {
        let link = self.path.join(&config.enabled_link_name);

        let desired = match self.enabled() {
            Some(variant) => Some(
                std::path::absolute(variant.path())
                    .map_err(|e| ConfsError::io("resolve", variant.path(), e))?,
            ),
            None => None,
        };

        let current = if fs::entry_exists(&link) {
            if !fs::is_symlink(&link) {
                return Err(ConfsError::ExpectedSymlink(link));
            }
            let target = fs::read_link(&link)?;
            Some(if target.is_relative() {
                self.path.join(target)
            } else {
                target
            })
        } else {
            None
        };

        if desired == current {
            return Ok(());
        }
        if current.is_some() {
            fs::remove_symlink(&link)?;
        }
        if let Some(desired) = desired {
            fs::create_symlink(&desired, &link)?;
        }
        Ok(())
    }

    fn variant_error(&self, variant: &str, reason: &str) -> ConfsError {
        ConfsError::InvalidVariantName {
            group: self.name.clone(),
            variant: variant.to_string(),
            reason: reason.to_string(),
        }
    }
}
