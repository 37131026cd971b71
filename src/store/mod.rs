//! The on-disk store of configuration groups.
//!
//! ```text
//! <store>/
//!   <group>/
//!     enabled -> <store>/<group>/<variant>
//!     <variant>/
//!       targets/
//!         <name> -> <live path>
//!       <name>
//! ```
//!
//! Everything is loaded into an in-memory [`ConfigGroup`] → [`Variant`] →
//! [`ManagedFile`] tree, mutated there, and written back with `save`, which
//! only touches entries that differ from the desired state.
pub mod fs;
pub mod group;
pub mod identifier;
pub mod managed_file;
pub mod variant;

use std::path::{Path, PathBuf};

pub use group::ConfigGroup;
pub use identifier::Identifier;
pub use managed_file::ManagedFile;
pub use variant::Variant;

use crate::config::Config;
use crate::error::{ConfsError, Result};

/// Variant created when a group is created without naming one.
pub const DEFAULT_VARIANT: &str = "default";

/// Entry point for every store operation.
#[derive(Debug, Clone)]
pub struct Store {
    config: Config,
    root: PathBuf,
}

impl Store {
    /// Open the store configured by `config`. Nothing is read yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the store path cannot be made absolute.
    pub fn new(config: Config) -> Result<Self> {
        let expanded = config.store_root();
        let root =
            std::path::absolute(&expanded).map_err(|e| ConfsError::io("resolve", expanded, e))?;
        Ok(Self { config, root })
    }

    /// Settings in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Absolute store root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the group called `name`.
    #[must_use]
    pub fn group_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load every group in the store, sorted by name.
    ///
    /// A store root that does not exist yet holds no groups.
    ///
    /// # Errors
    ///
    /// Fails on the first group that cannot be loaded; no partial list is
    /// returned.
    pub fn load_all(&self) -> Result<Vec<ConfigGroup>> {
        if !fs::entry_exists(&self.root) {
            return Ok(Vec::new());
        }
        if !self.root.is_dir() {
            return Err(ConfsError::ExpectedDirectory(self.root.clone()));
        }

        let mut groups = Vec::new();
        for (path, name) in fs::sorted_entries(&self.root)? {
            let Some(name) = name else {
                return Err(ConfsError::InvalidGroupName {
                    name: path.display().to_string(),
                    reason: "group directory name is not valid UTF-8".to_string(),
                });
            };
            if self.config.is_excluded_group(&name) || !path.is_dir() {
                continue;
            }
            groups.push(ConfigGroup::load(&path, &self.config)?);
        }
        tracing::debug!(
            "loaded {} groups from {}",
            groups.len(),
            self.root.display()
        );
        Ok(groups)
    }

    /// Load the group called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidGroupName`] if there is no such group, or
    /// the error raised while loading it.
    pub fn load_group(&self, name: &str) -> Result<ConfigGroup> {
        let path = self.group_path(name);
        if self.config.is_excluded_group(name) || !path.is_dir() {
            return Err(ConfsError::InvalidGroupName {
                name: name.to_string(),
                reason: format!("no such group in {}", self.root.display()),
            });
        }
        ConfigGroup::load(&path, &self.config)
    }

    /// Create a group, a variant, or both.
    ///
    /// `group` alone creates the group with a [`DEFAULT_VARIANT`] variant;
    /// `group/variant` adds the variant, creating the group if needed. A
    /// group with no enabled variant gets the new one enabled.
    ///
    /// Returns the saved group and whether the group itself was new.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidGroupName`] when `group` alone names an
    /// existing group, [`ConfsError::InvalidVariantName`] when the variant
    /// exists, or the error raised while saving.
    pub fn create(&self, identifier: &Identifier) -> Result<(ConfigGroup, bool)> {
        let path = self.group_path(&identifier.group);
        let exists = fs::entry_exists(&path);

        let variant = match identifier.variant.as_deref() {
            Some(variant) => variant,
            None if exists => {
                return Err(ConfsError::InvalidGroupName {
                    name: identifier.group.clone(),
                    reason: "group already exists".to_string(),
                });
            }
            None => DEFAULT_VARIANT,
        };

        let mut group = if exists {
            self.load_group(&identifier.group)?
        } else {
            ConfigGroup::new(&identifier.group, &self.root)
        };
        group.create_variant(variant, &self.config)?;
        if group.enabled().is_none() {
            group.enable_variant(variant)?;
        }
        group.save(&self.config)?;

        tracing::debug!("created {}/{variant}", group.name());
        Ok((group, !exists))
    }

    /// Point the group's enabled link at the identified variant.
    ///
    /// # Errors
    ///
    /// Fails if the identifier has no variant, the group or variant does not
    /// exist, or saving fails.
    pub fn enable(&self, identifier: &Identifier) -> Result<ConfigGroup> {
        let variant = require_variant(identifier)?;
        let mut group = self.load_group(&identifier.group)?;
        group.enable_variant(variant)?;
        group.save(&self.config)?;
        Ok(group)
    }

    /// Migrate each path in `paths` into the identified variant.
    ///
    /// Paths are processed in order; the first failure stops the run. Paths
    /// migrated before it stay migrated, the failing one is rolled back.
    ///
    /// # Errors
    ///
    /// Fails if the identifier has no variant, the group or variant does not
    /// exist, or a migration fails.
    pub fn migrate(&self, identifier: &Identifier, paths: &[PathBuf]) -> Result<ConfigGroup> {
        let variant_name = require_variant(identifier)?;
        let mut group = self.load_group(&identifier.group)?;
        let variant = group.variant_mut(variant_name)?;
        for path in paths {
            let file = variant.migrate(path, &self.config)?;
            tracing::debug!(
                "{} now managed as {identifier}/{}",
                path.display(),
                file.name()
            );
        }
        Ok(group)
    }
}

fn require_variant(identifier: &Identifier) -> Result<&str> {
    identifier
        .variant
        .as_deref()
        .ok_or_else(|| ConfsError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: "variant name is missing (expected group/variant)".to_string(),
        })
}
