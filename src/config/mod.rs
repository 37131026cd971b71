//! Process-wide settings.
//!
//! A [`Config`] is built once per invocation from defaults, an optional
//! settings file ([`file`]) and command-line overrides. After that it is only
//! changed through [`Config::set`], which accepts the fixed key space of
//! [`ConfigKey`] and nothing else.
pub mod file;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default name of the per-group pointer to the enabled variant.
pub const DEFAULT_ENABLED_LINK_NAME: &str = "enabled";
/// Default name of the per-variant directory holding pointer symlinks.
pub const DEFAULT_TARGETS_DIR_NAME: &str = "targets";
/// Store directory name under `$HOME`.
pub const DEFAULT_STORE_DIR: &str = ".confs";

/// How command output is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Pretty when stdout is a terminal, terse otherwise.
    #[default]
    Auto,
    /// Aligned columns, headers and colours.
    Pretty,
    /// Space-separated, header-less output for scripts.
    Terse,
}

impl DisplayMode {
    /// Resolve [`DisplayMode::Auto`] against whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, is_terminal: bool) -> Self {
        match self {
            Self::Auto if is_terminal => Self::Pretty,
            Self::Auto => Self::Terse,
            other => other,
        }
    }

    /// `true` for [`DisplayMode::Pretty`].
    #[must_use]
    pub const fn is_pretty(self) -> bool {
        matches!(self, Self::Pretty)
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Auto => "auto",
            Self::Pretty => "pretty",
            Self::Terse => "terse",
        })
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "pretty" => Ok(Self::Pretty),
            "terse" => Ok(Self::Terse),
            other => Err(format!("expected auto, pretty or terse, got '{other}'")),
        }
    }
}

/// The settings that can be read and written by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigKey {
    /// Root directory of the store.
    StorePath,
    /// Name of the per-group enabled symlink.
    EnabledLinkName,
    /// Name of the per-variant pointer directory.
    TargetsDirName,
    /// Group names skipped when scanning the store.
    ExcludedGroups,
    /// Variant names skipped when scanning a group.
    ExcludedVariants,
    /// File names skipped when scanning a pointer directory.
    ExcludedFiles,
    /// Output rendering.
    DisplayMode,
}

impl ConfigKey {
    /// Every key, in display order.
    pub const ALL: [Self; 7] = [
        Self::StorePath,
        Self::EnabledLinkName,
        Self::TargetsDirName,
        Self::ExcludedGroups,
        Self::ExcludedVariants,
        Self::ExcludedFiles,
        Self::DisplayMode,
    ];

    /// The key as written on the command line and in the settings file.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StorePath => "store_path",
            Self::EnabledLinkName => "enabled_link_name",
            Self::TargetsDirName => "targets_dir_name",
            Self::ExcludedGroups => "excluded_groups",
            Self::ExcludedVariants => "excluded_variants",
            Self::ExcludedFiles => "excluded_files",
            Self::DisplayMode => "display_mode",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// All settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Root directory of the store.
    pub store_path: PathBuf,
    /// Name of the per-group enabled symlink.
    pub enabled_link_name: String,
    /// Name of the per-variant pointer directory.
    pub targets_dir_name: String,
    /// Group names skipped when scanning the store.
    pub excluded_groups: Vec<String>,
    /// Variant names skipped when scanning a group (the enabled link name is
    /// always skipped as well).
    pub excluded_variants: Vec<String>,
    /// File names skipped when scanning a pointer directory.
    pub excluded_files: Vec<String>,
    /// Output rendering.
    pub display_mode: DisplayMode,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_store(default_store_path())
    }
}

impl Config {
    /// Default settings rooted at `store_path`.
    #[must_use]
    pub fn with_store(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store_path: store_path.into(),
            enabled_link_name: DEFAULT_ENABLED_LINK_NAME.to_string(),
            targets_dir_name: DEFAULT_TARGETS_DIR_NAME.to_string(),
            excluded_groups: vec![".git".to_string()],
            excluded_variants: vec![".git".to_string()],
            excluded_files: vec![".git".to_string()],
            display_mode: DisplayMode::Auto,
        }
    }

    /// The store root with a leading `~` expanded.
    #[must_use]
    pub fn store_root(&self) -> PathBuf {
        expand_tilde(&self.store_path)
    }

    /// `true` if `name` is never treated as a group.
    #[must_use]
    pub fn is_excluded_group(&self, name: &str) -> bool {
        self.excluded_groups.iter().any(|g| g == name)
    }

    /// `true` if `name` is never treated as a variant.
    #[must_use]
    pub fn is_excluded_variant(&self, name: &str) -> bool {
        name == self.enabled_link_name || self.excluded_variants.iter().any(|v| v == name)
    }

    /// `true` if `name` is never treated as a managed file.
    #[must_use]
    pub fn is_excluded_file(&self, name: &str) -> bool {
        self.excluded_files.iter().any(|f| f == name)
    }

    /// Read a setting as a string (lists are comma-separated).
    #[must_use]
    pub fn get(&self, key: ConfigKey) -> String {
        match key {
            ConfigKey::StorePath => self.store_path.display().to_string(),
            ConfigKey::EnabledLinkName => {
                self.enabled_link_name = checked_name(key, value)?;
            }
            ConfigKey::TargetsDirName => {
                self.targets_dir_name = checked_name(key, value)?;
            }
            ConfigKey::ExcludedGroups => {
                self.excluded_groups = checked_list(key, &split_list(value))?;
            }
            ConfigKey::ExcludedVariants => {
                self.excluded_variants = checked_list(key, &split_list(value))?;
            }
            ConfigKey::ExcludedFiles => {
                self.excluded_files = checked_list(key, &split_list(value))?;
            }
            ConfigKey::DisplayMode => {
                self.display_mode = value
                    .parse()
                    .map_err(|r: String| invalid(key, value, &r))?;
            }
        }
        Ok(())
    }

    /// Every setting with its current value, in [`ConfigKey::ALL`] order.
    #[must_use]
    pub fn entries(&self) -> Vec<(ConfigKey, String)> {
        ConfigKey::ALL
            .into_iter()
            .map(|key| (key, self.get(key)))
            .collect()
    }
}

/// `$HOME/.confs`, or `./.confs` when no home directory is known.
fn default_store_path() -> PathBuf {
    home_dir().map_or_else(|| PathBuf::from(DEFAULT_STORE_DIR), |h| h.join(DEFAULT_STORE_DIR))
}

/// The user's home directory from `HOME` (or `USERPROFILE`).
pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .ok()
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Expand a leading `~` in `path`; other paths are returned unchanged.
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    path.to_str().map_or_else(
        || path.to_path_buf(),
        |s| PathBuf::from(shellexpand::tilde(s).as_ref()),
    )
}

fn invalid(key: ConfigKey, value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// A non-empty store path.
fn checked_path(key: ConfigKey, value: &Path) -> Result<PathBuf, ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(invalid(key, "", "path must not be empty"));
    }
    Ok(value.to_path_buf())
}

/// A trimmed, non-empty name without `/`, usable as a directory entry.
fn checked_name(key: ConfigKey, value: &str) -> Result<String, ConfigError> {
    let name = value.trim();
    if name.is_empty() {
        return Err(invalid(key, value, "name must not be empty"));
    }
    if name.contains('/') || name == "." || name == ".." {
        return Err(invalid(key, value, "name must not contain '/' or be '.' or '..'"));
    }
    Ok(name.to_string())
}

fn checked_list(key: ConfigKey, values: &[String]) -> Result<Vec<String>, ConfigError> {
    values.iter().map(|v| checked_name(key, v)).collect()
}

/// Comma-separated list with blank entries dropped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_store_layout() {
        let config = Config::with_store("/store");
        assert_eq!(config.enabled_link_name, "enabled");
        assert_eq!(config.targets_dir_name, "targets");
        assert!(config.is_excluded_group(".git"));
        assert!(config.is_excluded_variant("enabled"));
        assert!(config.is_excluded_variant(".git"));
        assert!(!config.is_excluded_variant("default"));
        assert_eq!(config.display_mode, DisplayMode::Auto);
    }

    #[test]
    fn each_config_owns_its_lists() {
        let mut a = Config::with_store("/a");
        let b = Config::with_store("/b");
        a.excluded_groups.push("cache".to_string());
        assert_eq!(b.excluded_groups, vec![".git".to_string()]);
    }

    #[test]
    fn key_round_trips_through_str() {
        for key in ConfigKey::ALL {
            assert_eq!(key.as_str().parse::<ConfigKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = "use_colors".parse::<ConfigKey>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "use_colors"));
    }

    #[test]
    fn set_then_get_list() {
        let mut config = Config::with_store("/store");
        config
            .set(ConfigKey::ExcludedGroups, ".git, .hg ,cache")
            .unwrap();
        assert_eq!(config.get(ConfigKey::ExcludedGroups), ".git,.hg,cache");
        assert!(config.is_excluded_group(".hg"));
    }

    #[test]
    fn set_rejects_name_with_separator() {
        let mut config = Config::with_store("/store");
        let err = config
            .set(ConfigKey::TargetsDirName, "a/b")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert_eq!(config.targets_dir_name, "targets");
    }

    #[test]
    fn set_display_mode() {
        let mut config = Config::with_store("/store");
        config.set(ConfigKey::DisplayMode, "terse").unwrap();
        assert_eq!(config.display_mode, DisplayMode::Terse);
        assert!(config.set(ConfigKey::DisplayMode, "loud").is_err());
    }

    #[test]
    fn display_mode_auto_follows_terminal() {
        assert_eq!(DisplayMode::Auto.resolve(true), DisplayMode::Pretty);
        assert_eq!(DisplayMode::Auto.resolve(false), DisplayMode::Terse);
        assert_eq!(DisplayMode::Terse.resolve(true), DisplayMode::Terse);
    }

    #[test]
    fn entries_cover_every_key() {
        let config = Config::with_store("/store");
        let entries = config.entries();
        assert_eq!(entries.len(), ConfigKey::ALL.len());
        assert_eq!(entries[0], (ConfigKey::StorePath, "/store".to_string()));
    }

    #[test]
    fn expand_tilde_leaves_absolute_paths() {
        assert_eq!(
            expand_tilde(Path::new("/etc/vimrc")),
            PathBuf::from("/etc/vimrc")
        );
    }
}
