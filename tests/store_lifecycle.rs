#![cfg(unix)]
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
//! Integration tests for loading and saving the store.
//!
//! These tests drive the public [`Store`] API against a temporary directory
//! and check both the in-memory model and the symlinks left on disk.

mod common;

use std::os::unix::fs::symlink;

use common::IntegrationTestContext;
use confs::error::ConfsError;
use confs::store::{DEFAULT_VARIANT, Identifier};

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

/// Creating a bare group lays out the default variant and its enabled link.
#[test]
fn create_group_writes_layout() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();

    let (group, created) = store.create(&Identifier::parse("vim").unwrap()).unwrap();

    assert!(created);
    assert_eq!(group.variants().len(), 1);
    let root = ctx.store_path();
    assert!(root.join("vim/default/targets").is_dir());
    assert_eq!(
        std::fs::read_link(root.join("vim/enabled")).unwrap(),
        root.join("vim").join(DEFAULT_VARIANT)
    );
}

/// Adding a variant to an existing group keeps the enabled one.
#[test]
fn create_variant_keeps_enabled_variant() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    store.create(&Identifier::parse("vim").unwrap()).unwrap();

    let (group, created) = store
        .create(&Identifier::parse("vim/work").unwrap())
        .unwrap();

    assert!(!created);
    assert_eq!(group.enabled().unwrap().name(), DEFAULT_VARIANT);
    let names: Vec<&str> = group.variants().iter().map(|v| v.name()).collect();
    assert!(names.contains(&"work"));
    assert!(ctx.store_path().join("vim/work/targets").is_dir());
}

/// Creating a variant twice is rejected.
#[test]
fn create_duplicate_variant_fails() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    store.create(&Identifier::parse("vim/work").unwrap()).unwrap();

    assert!(matches!(
        store.create(&Identifier::parse("vim/work").unwrap()),
        Err(ConfsError::InvalidVariantName { .. })
    ));
}

// ---------------------------------------------------------------------------
// Round trip
// ---------------------------------------------------------------------------

/// Targets added in memory and saved are found again by a fresh load.
#[test]
fn saved_targets_load_back() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    let config = store.config().clone();
    store.create(&Identifier::parse("vim").unwrap()).unwrap();

    let mut group = store.load_group("vim").unwrap();
    let variant = group.variant_mut(DEFAULT_VARIANT).unwrap();
    variant
        .add_target("vimrc", ctx.home().join(".vimrc"), &config)
        .unwrap();
    variant.add_target("vim", "~/.vim", &config).unwrap();
    group.save(&config).unwrap();

    let reloaded = store.load_group("vim").unwrap();
    let variant = reloaded.enabled().unwrap();
    let mut targets: Vec<(&str, String)> = variant
        .targets()
        .iter()
        .map(|t| (t.name(), t.live_path().display().to_string()))
        .collect();
    targets.sort();
    assert_eq!(
        targets,
        vec![
            ("vim", "~/.vim".to_string()),
            ("vimrc", ctx.home().join(".vimrc").display().to_string()),
        ]
    );
    assert_eq!(
        std::fs::read_link(ctx.store_path().join("vim/default/targets/vim")).unwrap(),
        std::path::Path::new("~/.vim")
    );
}

/// Saving an unchanged group leaves every symlink untouched.
#[test]
fn saving_unchanged_group_is_idempotent() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    let config = store.config().clone();
    store.create(&Identifier::parse("vim").unwrap()).unwrap();
    let mut group = store.load_group("vim").unwrap();
    group
        .variant_mut(DEFAULT_VARIANT)
        .unwrap()
        .add_target("vimrc", ctx.home().join(".vimrc"), &config)
        .unwrap();
    group.save(&config).unwrap();

    let pointer = ctx.store_path().join("vim/default/targets/vimrc");
    let link = ctx.store_path().join("vim/enabled");
    let before = (
        std::fs::symlink_metadata(&pointer).unwrap().modified().unwrap(),
        std::fs::symlink_metadata(&link).unwrap().modified().unwrap(),
    );

    store.load_group("vim").unwrap().save(&config).unwrap();

    let after = (
        std::fs::symlink_metadata(&pointer).unwrap().modified().unwrap(),
        std::fs::symlink_metadata(&link).unwrap().modified().unwrap(),
    );
    assert_eq!(before, after);
}

/// Groups come back sorted and excluded entries are ignored.
#[test]
fn load_all_is_sorted_and_skips_excluded() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    for name in ["zsh", "bash", "vim"] {
        store.create(&Identifier::parse(name).unwrap()).unwrap();
    }
    std::fs::create_dir_all(ctx.store_path().join(".git/objects")).unwrap();
    ctx.write_store_file("README", "not a group");

    let names: Vec<String> = store
        .load_all()
        .unwrap()
        .iter()
        .map(|g| g.name().to_string())
        .collect();
    assert_eq!(names, vec!["bash", "vim", "zsh"]);
}

// ---------------------------------------------------------------------------
// Load failures
// ---------------------------------------------------------------------------

/// A group directory without an enabled link cannot be loaded.
#[test]
fn group_without_enabled_link_fails() {
    let ctx = IntegrationTestContext::new();
    std::fs::create_dir_all(ctx.store_path().join("vim/default/targets")).unwrap();

    assert!(matches!(
        ctx.store().load_group("vim"),
        Err(ConfsError::MissingEnabledLink(_))
    ));
    assert!(ctx.store().load_all().is_err());
}

/// A variant without a pointer directory cannot be loaded.
#[test]
fn variant_without_targets_dir_fails() {
    let ctx = IntegrationTestContext::new();
    let root = ctx.store_path();
    std::fs::create_dir_all(root.join("vim/default")).unwrap();
    symlink(root.join("vim/default"), root.join("vim/enabled")).unwrap();

    assert!(matches!(
        ctx.store().load_group("vim"),
        Err(ConfsError::ExpectedDirectory(_))
    ));
}

/// A regular file where the enabled link belongs is reported.
#[test]
fn enabled_link_that_is_a_file_fails() {
    let ctx = IntegrationTestContext::new();
    std::fs::create_dir_all(ctx.store_path().join("vim/default/targets")).unwrap();
    ctx.write_store_file("vim/enabled", "default");

    assert!(matches!(
        ctx.store().load_group("vim"),
        Err(ConfsError::ExpectedSymlink(_))
    ));
}

/// Loading a group that does not exist names the group.
#[test]
fn unknown_group_fails() {
    let ctx = IntegrationTestContext::new();
    let Err(ConfsError::InvalidGroupName { name, .. }) = ctx.store().load_group("emacs") else {
        panic!("expected InvalidGroupName");
    };
    assert_eq!(name, "emacs");
}

// ---------------------------------------------------------------------------
// enable
// ---------------------------------------------------------------------------

/// Enabling another variant repoints the enabled link.
#[test]
fn enable_switches_link() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    store.create(&Identifier::parse("vim").unwrap()).unwrap();
    store.create(&Identifier::parse("vim/work").unwrap()).unwrap();

    let group = store.enable(&Identifier::parse("vim/work").unwrap()).unwrap();

    assert_eq!(group.enabled().unwrap().name(), "work");
    assert_eq!(
        std::fs::read_link(ctx.store_path().join("vim/enabled")).unwrap(),
        ctx.store_path().join("vim/work")
    );
}

/// Enabling needs a variant name and an existing variant.
#[test]
fn enable_rejects_missing_variant() {
    let ctx = IntegrationTestContext::new();
    let store = ctx.store();
    store.create(&Identifier::parse("vim").unwrap()).unwrap();

    assert!(matches!(
        store.enable(&Identifier::parse("vim").unwrap()),
        Err(ConfsError::InvalidIdentifier { .. })
    ));
    assert!(matches!(
        store.enable(&Identifier::parse("vim/work").unwrap()),
        Err(ConfsError::InvalidVariantName { .. })
    ));
}
