//! A named alternative within a group, owning its managed files.
use std::path::{Path, PathBuf};

use super::fs;
use super::managed_file::ManagedFile;
use crate::config::{Config, expand_tilde};
use crate::error::{ConfsError, Result};

/// A named set of managed files, e.g. `vim/work`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    name: String,
    path: PathBuf,
    targets: Vec<ManagedFile>,
}

impl Variant {
    /// A new, empty variant inside the group directory `group_path`.
    #[must_use]
    pub fn new(name: impl Into<String>, group_path: &Path) -> Self {
        let name = name.into();
        Self {
            path: group_path.join(&name),
            name,
            targets: Vec::new(),
        }
    }

    /// Load the variant at `path` and every managed file in its pointer
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::ExpectedDirectory`] if the pointer directory is
    /// missing, or the first error raised by a managed file.
    pub fn load(path: &Path, config: &Config) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ConfsError::InvalidVariantName {
                group: parent_name(path),
                variant: path.display().to_string(),
                reason: "a variant needs a non-empty UTF-8 directory name".to_string(),
            })?;

        let targets_dir = path.join(&config.targets_dir_name);
        if !targets_dir.is_dir() {
            return Err(ConfsError::ExpectedDirectory(targets_dir));
        }

        let mut targets = Vec::new();
        for (entry, entry_name) in fs::sorted_entries(&targets_dir)? {
            if entry_name
                .as_deref()
                .is_some_and(|n| config.is_excluded_file(n))
            {
                continue;
            }
            targets.push(ManagedFile::from_pointer(&entry, path)?);
        }

        let variant = Self {
            name: name.to_string(),
            path: path.to_path_buf(),
            targets,
        };
        for missing in variant.missing_contents() {
            tracing::debug!(
                "content {} declared by {}/{} is missing",
                missing.display(),
                parent_name(path),
                variant.name
            );
        }
        Ok(variant)
    }

    /// Name of the variant, unique within its group.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory of the variant.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Managed files in load/insertion order.
    #[must_use]
    pub fn targets(&self) -> &[ManagedFile] {
        &self.targets
    }

    /// Directory holding the pointer symlinks.
    #[must_use]
    pub fn targets_dir(&self, config: &Config) -> PathBuf {
        self.path.join(&config.targets_dir_name)
    }

    /// Content paths of managed files whose content exists.
    #[must_use]
    pub fn contents(&self) -> Vec<PathBuf> {
        self.targets
            .iter()
            .filter(|t| t.has_content())
            .map(|t| t.content_path().to_path_buf())
            .collect()
    }

    /// Content paths of managed files whose content is missing.
    #[must_use]
    pub fn missing_contents(&self) -> Vec<PathBuf> {
        self.targets
            .iter()
            .filter(|t| !t.has_content())
            .map(|t| t.content_path().to_path_buf())
            .collect()
    }

    /// Look up a managed file by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidTargetName`] if there is none.
    pub fn target(&self, name: &str) -> Result<&ManagedFile> {
        self.targets
            .iter()
            .find(|t| t.name() == name)
            .ok_or_else(|| self.target_error(vec![name.to_string()], "no such target"))
    }

    /// The managed files named in `names`, in variant order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidTargetName`] listing every name that does
    /// not exist.
    pub fn select_targets(&self, names: &[String]) -> Result<Vec<&ManagedFile>> {
        let missing: Vec<String> = names
            .iter()
            .filter(|n| !self.targets.iter().any(|t| t.name() == n.as_str()))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(self.target_error(missing, "no such target"));
        }
        Ok(self
            .targets
            .iter()
            .filter(|t| names.iter().any(|n| n == t.name()))
            .collect())
    }

    /// Register a managed file and write its pointer symlink.
    ///
    /// Only the pointer is written; creating the content at
    /// `<variant>/<name>` is up to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidTargetName`] for a malformed or duplicate
    /// name, or the error raised while saving the pointer.
    pub fn add_target(
        &mut self,
        name: &str,
        live_path: impl Into<PathBuf>,
        config: &Config,
    ) -> Result<&ManagedFile> {
        self.validate_target_name(name, config)?;
        fs::ensure_dir(&self.targets_dir(config))?;

        let file = ManagedFile::new(name, live_path, &self.path, config);
        file.save()?;
        tracing::debug!(
            "added target {name} -> {} to {}",
            file.live_path().display(),
            self.name
        );
        self.targets.push(file);
        self.target(name)
    }

    /// Remove a managed file's pointer symlink and drop it from the variant.
    ///
    /// Content and any install symlink are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidTargetName`] if there is no such file, or
    /// the error raised while removing its pointer.
    pub fn delete_target(&mut self, name: &str) -> Result<ManagedFile> {
        let index = self
            .targets
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| self.target_error(vec![name.to_string()], "no such target"))?;
        if let Some(file) = self.targets.get_mut(index) {
            file.mark_for_deletion();
            file.save()?;
        }
        Ok(self.targets.remove(index))
    }

    /// Create the variant and pointer directories if needed, then save every
    /// managed file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::ExpectedDirectory`] if a non-directory occupies
    /// either directory, or the first error raised by a managed file.
    pub fn save(&self, config: &Config) -> Result<()> {
        fs::ensure_dir(&self.path)?;
        fs::ensure_dir(&self.targets_dir(config))?;
        for file in &self.targets {
            file.save()?;
        }
        Ok(())
    }

    /// Install every managed file, stopping at the first failure.
    ///
    /// Files installed before the failure stay installed.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a managed file.
    pub fn install(&self) -> Result<()> {
        for file in &self.targets {
            tracing::debug!(
                "installing {} -> {}",
                file.live_path().display(),
                file.content_path().display()
            );
            file.install()?;
        }
        Ok(())
    }

    /// Uninstall every installed managed file, stopping at the first failure.
    ///
    /// Files that are not installed are skipped.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by a managed file.
    pub fn uninstall(&self) -> Result<()> {
        for file in &self.targets {
            if !file.is_installed() {
                tracing::debug!("skipping {}, not installed", file.name());
                continue;
            }
            tracing::debug!("uninstalling {}", file.live_path().display());
            file.uninstall()?;
        }
        Ok(())
    }

    /// Move the file or directory at `source` into the variant and install it
    /// back at its original location.
    ///
    /// The managed file is named after the last component of `source`. If
    /// the move, install or save fails, the content is moved back and the
    /// managed file is removed before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfsError::InvalidTargetPath`] if `source` does not exist,
    /// [`ConfsError::InvalidOperation`] if the content path is taken, the
    /// error that aborted the migration, or
    /// [`ConfsError::RollbackFailed`] if undoing it failed as well.
    pub fn migrate(&mut self, source: &Path, config: &Config) -> Result<&ManagedFile> {
        let source = std::path::absolute(expand_tilde(source))
            .map_err(|e| ConfsError::io("resolve", source, e))?;
        if !fs::entry_exists(&source) {
            return Err(ConfsError::InvalidTargetPath {
                path: source,
                reason: "nothing to migrate at this path".to_string(),
            });
        }
        let name = source
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| ConfsError::InvalidTargetPath {
                path: source.clone(),
                reason: "a target needs a UTF-8 file name".to_string(),
            })?;
        let content = self.path.join(&name);
        if fs::entry_exists(&content) {
            return Err(ConfsError::InvalidOperation(format!(
                "content {} already exists",
                content.display()
            )));
        }

        self.add_target(&name, &source, config)?;

        if let Err(error) = fs::rename(&source, &content) {
            return Err(self.roll_back_migrate(&name, &source, false, error));
        }

        let installed = self
            .target(&name)
            .and_then(ManagedFile::install)
            .and_then(|()| self.save(config));
        if let Err(error) = installed {
            return Err(self.roll_back_migrate(&name, &source, true, error));
        }

        tracing::debug!("migrated {} to {}", source.display(), content.display());
        self.target(&name)
    }

    fn roll_back_migrate(
        &mut self,
        name: &str,
        source: &Path,
        moved: bool,
        error: ConfsError,
    ) -> ConfsError {
        tracing::debug!("rolling back migration of {}: {error}", source.display());
        match self.undo_migrate(name, source, moved) {
            Ok(()) => error,
            Err(rollback) => ConfsError::RollbackFailed {
                error: Box::new(error),
                rollback: Box::new(rollback),
            },
        }
    }

    fn undo_migrate(&mut self, name: &str, source: &Path, moved: bool) -> Result<()> {
        if moved {
            let file = self.target(name)?;
            if file.is_installed() {
                file.uninstall()?;
            }
            fs::rename(file.content_path(), source)?;
        }
        self.delete_target(name).map(drop)
    }

    fn validate_target_name(&self, name: &str, config: &Config) -> Result<()> {
        let reason = if name.is_empty() {
            "name is empty"
        } else if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
            "name must not contain a path separator"
        } else if name == "." || name == ".." || name == config.targets_dir_name {
            "name is reserved"
        } else if config.is_excluded_file(name) {
            "name is excluded from loading"
        } else if self.targets.iter().any(|t| t.name() == name) {
            "target already exists"
        } else {
            return Ok(());
        };
        Err(self.target_error(vec![name.to_string()], reason))
    }

    fn target_error(&self, names: Vec<String>, reason: &str) -> ConfsError {
        ConfsError::InvalidTargetName {
            variant: self.name.clone(),
            names,
            reason: reason.to_string(),
        }
    }
}

fn parent_name(path: &Path) -> String {
    path.parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(all(test, unix))]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::os::unix::fs::symlink;

    struct Fixture {
        dir: tempfile::TempDir,
        config: Config,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            std::fs::create_dir_all(dir.path().join("store").join("vim")).unwrap();
            std::fs::create_dir_all(dir.path().join("home")).unwrap();
            let config = Config::with_store(dir.path().join("store"));
            Self { dir, config }
        }

        fn group_path(&self) -> PathBuf {
            self.dir.path().join("store").join("vim")
        }

        fn home(&self) -> PathBuf {
            self.dir.path().join("home")
        }

        fn saved_variant(&self) -> Variant {
            let variant = Variant::new("default", &self.group_path());
            variant.save(&self.config).unwrap();
            variant
        }
    }

    #[test]
    fn save_creates_variant_and_pointer_dirs() {
        let f = Fixture::new();
        let variant = f.saved_variant();
        assert!(variant.path().is_dir());
        assert!(variant.targets_dir(&f.config).is_dir());
    }

    #[test]
    fn save_refuses_file_in_place_of_directory() {
        let f = Fixture::new();
        std::fs::write(f.group_path().join("default"), "").unwrap();
        let variant = Variant::new("default", &f.group_path());
        assert!(matches!(
            variant.save(&f.config),
            Err(ConfsError::ExpectedDirectory(_))
        ));
    }

    #[test]
    fn load_requires_pointer_directory() {
        let f = Fixture::new();
        let path = f.group_path().join("default");
        std::fs::create_dir(&path).unwrap();
        assert!(matches!(
            Variant::load(&path, &f.config),
            Err(ConfsError::ExpectedDirectory(_))
        ));
    }

    #[test]
    fn add_target_writes_pointer_only() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let live = f.home().join(".vimrc");

        let file = variant.add_target("vimrc", &live, &f.config).unwrap();
        assert_eq!(std::fs::read_link(file.pointer_path()).unwrap(), live);
        assert!(!fs::entry_exists(file.content_path()));
        assert_eq!(variant.missing_contents().len(), 1);
        assert!(variant.contents().is_empty());
    }

    #[test]
    fn add_target_rejects_duplicates_and_bad_names() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        variant.add_target("vimrc", f.home().join(".vimrc"), &f.config).unwrap();

        for name in ["vimrc", "", "a/b", "targets", "..", ".git"] {
            assert!(
                matches!(
                    variant.add_target(name, f.home().join("x"), &f.config),
                    Err(ConfsError::InvalidTargetName { .. })
                ),
                "expected InvalidTargetName for {name:?}"
            );
        }
        assert_eq!(variant.targets().len(), 1);
    }

    #[test]
    fn load_reads_targets_and_contents() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        variant.add_target("vimrc", f.home().join(".vimrc"), &f.config).unwrap();
        variant.add_target("vim", f.home().join(".vim"), &f.config).unwrap();
        std::fs::write(variant.path().join("vimrc"), "").unwrap();

        let loaded = Variant::load(variant.path(), &f.config).unwrap();
        let names: Vec<&str> = loaded.targets().iter().map(ManagedFile::name).collect();
        assert_eq!(names, vec!["vim", "vimrc"]);
        assert_eq!(loaded.contents(), vec![variant.path().join("vimrc")]);
        assert_eq!(loaded.missing_contents(), vec![variant.path().join("vim")]);
    }

    #[test]
    fn load_skips_excluded_files() {
        let f = Fixture::new();
        let variant = f.saved_variant();
        std::fs::create_dir(variant.targets_dir(&f.config).join(".git")).unwrap();

        let loaded = Variant::load(variant.path(), &f.config).unwrap();
        assert!(loaded.targets().is_empty());
    }

    #[test]
    fn load_fails_on_non_symlink_entry() {
        let f = Fixture::new();
        let variant = f.saved_variant();
        std::fs::write(variant.targets_dir(&f.config).join("stray"), "").unwrap();

        assert!(matches!(
            Variant::load(variant.path(), &f.config),
            Err(ConfsError::ExpectedSymlink(_))
        ));
    }

    #[test]
    fn delete_target_removes_pointer_and_entry() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let pointer = variant
            .add_target("vimrc", f.home().join(".vimrc"), &f.config)
            .unwrap()
            .pointer_path()
            .to_path_buf();

        let removed = variant.delete_target("vimrc").unwrap();
        assert_eq!(removed.name(), "vimrc");
        assert!(!fs::entry_exists(&pointer));
        assert!(variant.targets().is_empty());
        assert!(variant.delete_target("vimrc").is_err());
    }

    #[test]
    fn select_targets_reports_every_missing_name() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        variant.add_target("vimrc", f.home().join(".vimrc"), &f.config).unwrap();

        let err = variant
            .select_targets(&["vimrc".to_string(), "a".to_string(), "b".to_string()])
            .unwrap_err();
        match err {
            ConfsError::InvalidTargetName { names, .. } => assert_eq!(names, vec!["a", "b"]),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(
            variant.select_targets(&["vimrc".to_string()]).unwrap().len(),
            1
        );
    }

    #[test]
    fn install_stops_at_first_failure_without_rollback() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        variant.add_target("a", f.home().join("a"), &f.config).unwrap();
        variant.add_target("b", f.home().join("b"), &f.config).unwrap();
        variant.add_target("c", f.home().join("c"), &f.config).unwrap();
        for name in ["a", "b", "c"] {
            std::fs::write(variant.path().join(name), "").unwrap();
        }
        std::fs::write(f.home().join("b"), "user data").unwrap();

        let err = variant.install().unwrap_err();
        assert!(matches!(err, ConfsError::ExpectedSymlink(_)));
        assert!(variant.target("a").unwrap().is_installed());
        assert!(!variant.target("c").unwrap().is_installed());
    }

    #[test]
    fn uninstall_skips_files_not_installed() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        variant.add_target("a", f.home().join("a"), &f.config).unwrap();
        variant.add_target("b", f.home().join("b"), &f.config).unwrap();
        std::fs::write(variant.path().join("a"), "").unwrap();
        std::fs::write(variant.path().join("b"), "").unwrap();
        variant.target("a").unwrap().install().unwrap();

        variant.uninstall().unwrap();
        assert!(!variant.target("a").unwrap().is_installed());
        assert!(!fs::entry_exists(&f.home().join("a")));
    }

    #[test]
    fn migrate_file_moves_content_and_installs() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let vimrc = f.home().join(".vimrc");
        std::fs::write(&vimrc, "syntax on").unwrap();

        let file = variant.migrate(&vimrc, &f.config).unwrap();
        let content = file.content_path().to_path_buf();

        assert_eq!(std::fs::read_link(&vimrc).unwrap(), content);
        assert_eq!(std::fs::read_to_string(&content).unwrap(), "syntax on");
        assert_eq!(
            std::fs::read_link(variant.targets_dir(&f.config).join(".vimrc")).unwrap(),
            vimrc
        );
    }

    #[test]
    fn migrate_directory() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let vim = f.home().join(".vim");
        std::fs::create_dir_all(vim.join("colors")).unwrap();
        std::fs::write(vim.join("colors").join("dark.vim"), "hi").unwrap();

        variant.migrate(&vim, &f.config).unwrap();
        assert!(fs::is_symlink(&vim));
        assert_eq!(
            std::fs::read_to_string(vim.join("colors").join("dark.vim")).unwrap(),
            "hi"
        );
    }

    #[test]
    fn migrate_rolls_back_when_save_fails() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        // A pointer that was clobbered by a regular file makes the save fail.
        let broken = variant
            .add_target("broken", f.home().join("broken"), &f.config)
            .unwrap()
            .pointer_path()
            .to_path_buf();
        std::fs::remove_file(&broken).unwrap();
        std::fs::write(&broken, "").unwrap();

        let vimrc = f.home().join(".vimrc");
        std::fs::write(&vimrc, "original").unwrap();

        let err = variant.migrate(&vimrc, &f.config).unwrap_err();
        assert!(matches!(err, ConfsError::ExpectedSymlink(_)));

        assert!(!fs::is_symlink(&vimrc));
        assert_eq!(std::fs::read_to_string(&vimrc).unwrap(), "original");
        assert!(variant.target(".vimrc").is_err());
        assert!(!fs::entry_exists(&variant.path().join(".vimrc")));
        assert!(!fs::entry_exists(&variant.targets_dir(&f.config).join(".vimrc")));
    }

    #[test]
    fn migrate_refuses_existing_content() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let vimrc = f.home().join(".vimrc");
        std::fs::write(&vimrc, "mine").unwrap();
        std::fs::write(variant.path().join(".vimrc"), "stored").unwrap();

        assert!(matches!(
            variant.migrate(&vimrc, &f.config),
            Err(ConfsError::InvalidOperation(_))
        ));
        assert_eq!(std::fs::read_to_string(&vimrc).unwrap(), "mine");
        assert!(variant.targets().is_empty());
    }

    #[test]
    fn migrate_missing_source() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        assert!(matches!(
            variant.migrate(&f.home().join("nope"), &f.config),
            Err(ConfsError::InvalidTargetPath { .. })
        ));
    }

    #[test]
    fn migrate_refuses_excluded_name() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let git = f.home().join(".git");
        std::fs::create_dir(&git).unwrap();

        assert!(matches!(
            variant.migrate(&git, &f.config),
            Err(ConfsError::InvalidTargetName { .. })
        ));
        assert!(git.is_dir() && !fs::is_symlink(&git));
        assert!(!fs::entry_exists(&variant.path().join(".git")));
        assert!(!fs::entry_exists(&variant.targets_dir(&f.config).join(".git")));
    }

    #[test]
    fn rollback_after_failed_install_restores_source() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let vimrc = f.home().join(".vimrc");
        std::fs::write(&vimrc, "original").unwrap();
        // State right after the move, with no install symlink in place.
        variant.add_target(".vimrc", &vimrc, &f.config).unwrap();
        let content = variant.path().join(".vimrc");
        std::fs::rename(&vimrc, &content).unwrap();

        let err = variant.roll_back_migrate(
            ".vimrc",
            &vimrc,
            true,
            ConfsError::ExpectedSymlink(vimrc.clone()),
        );

        assert!(matches!(err, ConfsError::ExpectedSymlink(_)));
        assert_eq!(std::fs::read_to_string(&vimrc).unwrap(), "original");
        assert!(!fs::entry_exists(&content));
        assert!(variant.target(".vimrc").is_err());
        assert!(!fs::entry_exists(&variant.targets_dir(&f.config).join(".vimrc")));
    }

    #[test]
    fn failed_rollback_reports_both_errors() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let vimrc = f.home().join(".vimrc");
        // The content was never moved, so moving it back fails.
        variant.add_target(".vimrc", &vimrc, &f.config).unwrap();

        let err = variant.roll_back_migrate(
            ".vimrc",
            &vimrc,
            true,
            ConfsError::InvalidOperation("install failed".to_string()),
        );

        match err {
            ConfsError::RollbackFailed { error, rollback } => {
                assert!(matches!(*error, ConfsError::InvalidOperation(_)));
                assert!(matches!(*rollback, ConfsError::Io { action: "rename", .. }));
            }
            other => panic!("expected RollbackFailed, got {other}"),
        }
        assert!(variant.target(".vimrc").is_ok());
    }

    #[test]
    fn migrate_of_symlinked_source_keeps_it_working() {
        let f = Fixture::new();
        let mut variant = f.saved_variant();
        let real = f.home().join("real");
        std::fs::write(&real, "x").unwrap();
        let link = f.home().join(".linked");
        symlink(&real, &link).unwrap();

        variant.migrate(&link, &f.config).unwrap();
        assert_eq!(std::fs::read_to_string(&link).unwrap(), "x");
    }
}
