// Shared helpers for integration tests.
//
// Provides a temporary directory holding both a store and a fake home, so
// each test can create groups and install targets without touching the real
// home directory.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use confs::cli::GlobalOpts;
use confs::commands::CommandSetup;
use confs::config::Config;
use confs::store::Store;

/// An isolated store and home backed by a [`tempfile::TempDir`].
///
/// The directory is automatically deleted when dropped.
pub struct IntegrationTestContext {
    /// Temporary directory containing `store/`, `home/` and `config.toml`.
    pub root: tempfile::TempDir,
}

impl IntegrationTestContext {
    /// Create a new context with an empty home and no store yet.
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(root.path().join("home")).expect("create home dir");
        Self { root }
    }

    /// Store root inside the temporary directory.
    pub fn store_path(&self) -> PathBuf {
        self.root.path().join("store")
    }

    /// Fake home directory used for live paths.
    pub fn home(&self) -> PathBuf {
        self.root.path().join("home")
    }

    /// Settings file location (not created until something writes it).
    pub fn settings_path(&self) -> PathBuf {
        self.root.path().join("config.toml")
    }

    /// Default settings rooted at [`store_path`](Self::store_path).
    pub fn config(&self) -> Config {
        Config::with_store(self.store_path())
    }

    /// A [`Store`] over the temporary store root.
    pub fn store(&self) -> Store {
        Store::new(self.config()).expect("open store")
    }

    /// Command setup as the binary would build it, forced to terse output.
    pub fn setup(&self) -> CommandSetup {
        CommandSetup::init(&GlobalOpts {
            path: Some(self.store_path()),
            config: Some(self.settings_path()),
            pretty: false,
            terse: true,
        })
        .expect("command setup")
    }

    /// Write `contents` to `rel` under the home directory, creating parents.
    pub fn write_home_file(&self, rel: &str, contents: &str) -> PathBuf {
        write_file(&self.home().join(rel), contents)
    }

    /// Write `contents` to `rel` under the store root, creating parents.
    pub fn write_store_file(&self, rel: &str, contents: &str) -> PathBuf {
        write_file(&self.store_path().join(rel), contents)
    }
}

fn write_file(path: &Path, contents: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dirs");
    }
    std::fs::write(path, contents).expect("write file");
    path.to_path_buf()
}
