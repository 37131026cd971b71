//! Optional TOML settings file.
//!
//! Every field is optional; present fields override the defaults in
//! [`Config`]. A missing file behaves like an empty one.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{
    Config, ConfigKey, DisplayMode, checked_list, checked_name, checked_path, home_dir,
};
use crate::error::ConfigError;

/// On-disk shape of the settings file.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SettingsFile {
    /// Root directory of the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_path: Option<PathBuf>,
    /// Name of the per-group enabled symlink.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_link_name: Option<String>,
    /// Name of the per-variant pointer directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targets_dir_name: Option<String>,
    /// Group names skipped when scanning the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_groups: Option<Vec<String>>,
    /// Variant names skipped when scanning a group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_variants: Option<Vec<String>>,
    /// File names skipped when scanning a pointer directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excluded_files: Option<Vec<String>>,
    /// Output rendering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<DisplayMode>,
}

impl SettingsFile {
    /// Overlay the present fields onto `config`, validating each one the
    /// way [`Config::set`] does.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an empty path, or a name
    /// that is empty, contains `/`, or is `.` or `..`.
    pub fn apply(self, config: &mut Config) -> Result<(), ConfigError> {
        if let Some(v) = self.store_path {
            config.store_path = checked_path(ConfigKey::StorePath, &v)?;
        }
        if let Some(v) = self.enabled_link_name {
            config.enabled_link_name = checked_name(ConfigKey::EnabledLinkName, &v)?;
        }
        if let Some(v) = self.targets_dir_name {
            config.targets_dir_name = checked_name(ConfigKey::TargetsDirName, &v)?;
        }
        if let Some(v) = self.excluded_groups {
            config.excluded_groups = checked_list(ConfigKey::ExcludedGroups, &v)?;
        }
        if let Some(v) = self.excluded_variants {
            config.excluded_variants = checked_list(ConfigKey::ExcludedVariants, &v)?;
        }
        if let Some(v) = self.excluded_files {
            config.excluded_files = checked_list(ConfigKey::ExcludedFiles, &v)?;
        }
        if let Some(v) = self.display_mode {
            config.display_mode = v;
        }
        Ok(())
    }

    /// Copy the value of `key` from `config` into the file, leaving the
    /// other fields as they are.
    pub fn assign(&mut self, key: ConfigKey, config: &Config) {
        match key {
            ConfigKey::StorePath => self.store_path = Some(config.store_path.clone()),
            ConfigKey::EnabledLinkName => {
                self.enabled_link_name = Some(config.enabled_link_name.clone());
            }
            ConfigKey::TargetsDirName => {
                self.targets_dir_name = Some(config.targets_dir_name.clone());
            }
            ConfigKey::ExcludedGroups => {
                self.excluded_groups = Some(config.excluded_groups.clone());
            }
            ConfigKey::ExcludedVariants => {
                self.excluded_variants = Some(config.excluded_variants.clone());
            }
            ConfigKey::ExcludedFiles => {
                self.excluded_files = Some(config.excluded_files.clone());
            }
            ConfigKey::DisplayMode => self.display_mode = Some(config.display_mode),
        }
    }
}

/// `$XDG_CONFIG_HOME/confs/config.toml` (default `~/.config/confs/config.toml`).
#[must_use]
pub fn default_path() -> Option<PathBuf> {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|h| h.join(".config")))?;
    Some(config_dir.join("confs").join("config.toml"))
}

/// Read the settings file at `path`.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn read(path: &Path) -> Result<SettingsFile, ConfigError> {
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `settings` to `path`, creating parent directories as needed.
///
/// Only the fields present in `settings` are written.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be written.
pub fn write(path: &Path, settings: &SettingsFile) -> Result<(), ConfigError> {
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = toml::to_string_pretty(settings)?;
    std::fs::write(path, content).map_err(io_err)
}

impl Config {
    /// Defaults overlaid with the settings file at `path`, if given.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file exists but cannot be read or
    /// parsed, or holds an invalid value.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = path {
            read(path)?.apply(&mut config)?;
        }
        Ok(config)
    }
}
