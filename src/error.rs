//! Domain-specific error types for the configuration store.
//!
//! Store operations return typed errors ([`ConfsError`]) and settings
//! operations return [`ConfigError`]. Command handlers at the CLI boundary
//! convert them to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! ConfsError   — store layout, symlinks, identifiers, migrate rollback
//! ConfigError  — settings keys, values and the settings file
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias for results produced by store operations.
pub type Result<T, E = ConfsError> = std::result::Result<T, E>;

/// Errors that arise while loading, mutating or saving the store.
#[derive(Error, Debug)]
pub enum ConfsError {
    /// A directory could not be created (permission failures land here).
    #[error("could not create directory {}: {source}", .path.display())]
    DirectoryCreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A symlink could not be created.
    #[error("could not create symlink {} -> {}: {source}", .link.display(), .target.display())]
    SymlinkCreateFailed {
        /// Path of the symlink itself.
        link: PathBuf,
        /// Path the symlink should point at.
        target: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A directory was expected but something else occupies the path.
    #[error("expected a directory: {}", .0.display())]
    ExpectedDirectory(PathBuf),

    /// A symlink was expected but something else occupies the path.
    #[error("expected a symlink: {}", .0.display())]
    ExpectedSymlink(PathBuf),

    /// The group name is reserved, malformed or already taken.
    #[error("invalid group name '{name}': {reason}")]
    InvalidGroupName {
        /// Offending group name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// The operation does not apply to the current on-disk state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// A path cannot be used as a managed file.
    #[error("invalid target path {}: {reason}", .path.display())]
    InvalidTargetPath {
        /// Offending path.
        path: PathBuf,
        /// Why the path was rejected.
        reason: String,
    },

    /// A symlink exists but cannot be interpreted.
    #[error("invalid symlink {}: {reason}", .path.display())]
    InvalidSymlink {
        /// Path of the symlink.
        path: PathBuf,
        /// Why the symlink was rejected.
        reason: String,
    },

    /// The filesystem disagrees with what the store recorded.
    #[error("inconsistent data: {0}")]
    InconsistentData(String),

    /// A variant name is unknown, reserved, malformed or duplicated.
    #[error("invalid variant '{variant}' in group '{group}': {reason}")]
    InvalidVariantName {
        /// Owning group.
        group: String,
        /// Offending variant name.
        variant: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// One or more managed file names are unknown, malformed or duplicated.
    #[error("invalid target name(s) {names:?} in variant '{variant}': {reason}")]
    InvalidTargetName {
        /// Owning variant.
        variant: String,
        /// Offending target names.
        names: Vec<String>,
        /// Why the names were rejected.
        reason: String,
    },

    /// A group directory has no `enabled` symlink.
    #[error("enabled symlink not found: {}", .0.display())]
    MissingEnabledLink(PathBuf),

    /// An identifier is not of the form `group` or `group/variant`.
    #[error("invalid identifier '{identifier}': {reason}")]
    InvalidIdentifier {
        /// Identifier as given.
        identifier: String,
        /// Why the identifier was rejected.
        reason: String,
    },

    /// Any other filesystem failure.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted (e.g. `"rename"`).
        action: &'static str,
        /// Path the action was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A migrate failed and undoing it failed too.
    #[error("{error}; rollback also failed: {rollback}")]
    RollbackFailed {
        /// Error that triggered the rollback.
        error: Box<ConfsError>,
        /// Error raised while rolling back.
        rollback: Box<ConfsError>,
    },
}

impl ConfsError {
    /// Build an [`ConfsError::Io`] for `path`.
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Errors that arise from the settings record and its file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The key is not one of the known settings.
    #[error("unknown config key '{0}'")]
    UnknownKey(String),

    /// The value cannot be assigned to the key.
    #[error("invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Key being set.
        key: String,
        /// Rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An I/O error occurred while reading or writing the settings file.
    #[error("IO error on config file {}: {source}", .path.display())]
    Io {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The settings file is not valid TOML for the settings schema.
    #[error("invalid TOML in {}: {source}", .path.display())]
    Parse {
        /// Path to the settings file.
        path: PathBuf,
        /// Underlying parse error.
        source: toml::de::Error,
    },

    /// The settings could not be serialised.
    #[error("could not serialise config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn expected_symlink_display() {
        let e = ConfsError::ExpectedSymlink(PathBuf::from("/store/vim/enabled"));
        assert_eq!(e.to_string(), "expected a symlink: /store/vim/enabled");
    }

    #[test]
    fn invalid_identifier_display() {
        let e = ConfsError::InvalidIdentifier {
            identifier: "a/b/c".to_string(),
            reason: "more than one '/'".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "invalid identifier 'a/b/c': more than one '/'"
        );
    }

    #[test]
    fn directory_create_failed_has_source() {
        use std::error::Error as StdError;
        let e = ConfsError::DirectoryCreateFailed {
            path: PathBuf::from("/store/vim"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
        };
        assert!(e.source().is_some());
        assert!(e.to_string().contains("/store/vim"));
    }

    #[test]
    fn rollback_failed_mentions_both_errors() {
        let e = ConfsError::RollbackFailed {
            error: Box::new(ConfsError::InvalidOperation("save failed".to_string())),
            rollback: Box::new(ConfsError::ExpectedSymlink(PathBuf::from("/home/u/.vimrc"))),
        };
        let msg = e.to_string();
        assert!(msg.contains("save failed"));
        assert!(msg.contains("rollback also failed"));
        assert!(msg.contains("/home/u/.vimrc"));
    }

    #[test]
    fn config_error_unknown_key_display() {
        let e = ConfigError::UnknownKey("colour".to_string());
        assert_eq!(e.to_string(), "unknown config key 'colour'");
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_types_are_send_sync() {
        assert_send_sync::<ConfsError>();
        assert_send_sync::<ConfigError>();
    }

    #[test]
    fn confs_error_converts_to_anyhow() {
        let e = ConfsError::MissingEnabledLink(PathBuf::from("/store/vim/enabled"));
        let _anyhow_err: anyhow::Error = e.into();
    }
}
