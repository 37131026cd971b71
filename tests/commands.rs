#![cfg(unix)]
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
//! Integration tests for the subcommands.
//!
//! Each test drives the command `run` functions the way the binary does,
//! against a temporary store and home.

mod common;

use common::IntegrationTestContext;
use confs::cli::{AddOpts, ConfigCommand, IdentifierOpts, InstallOpts, ShowOpts, UninstallOpts};
use confs::commands::{self, CommandSetup};
use confs::config::{Config, DisplayMode};
use confs::logging::{Logger, TargetStatus};

fn ident(identifier: &str) -> IdentifierOpts {
    IdentifierOpts {
        identifier: identifier.to_string(),
    }
}

fn install_opts(identifier: &str, targets: &[&str]) -> InstallOpts {
    InstallOpts {
        identifier: identifier.to_string(),
        targets: targets.iter().map(ToString::to_string).collect(),
    }
}

/// `vim` with a `default` and a `work` variant, each holding a `vimrc`
/// file target for `~/.vimrc` in the fake home.
fn vim_with_two_variants(ctx: &IntegrationTestContext, setup: &CommandSetup) {
    let log = Logger::new("test");
    commands::create::run(setup, &ident("vim"), &log).unwrap();
    commands::create::run(setup, &ident("vim/work"), &log).unwrap();
    for variant in ["default", "work"] {
        commands::add::run(
            setup,
            &AddOpts {
                identifier: format!("vim/{variant}"),
                name: "vimrc".to_string(),
                dest: ctx.home().join(".vimrc"),
                is_file: true,
            },
            &log,
        )
        .unwrap();
        ctx.write_store_file(&format!("vim/{variant}/vimrc"), variant);
    }
}

// ---------------------------------------------------------------------------
// add
// ---------------------------------------------------------------------------

/// `add` writes the pointer and creates empty content of the requested kind.
#[test]
fn add_creates_pointer_and_content() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    let log = Logger::new("test");
    commands::create::run(&setup, &ident("vim"), &log).unwrap();

    commands::add::run(
        &setup,
        &AddOpts {
            identifier: "vim/default".to_string(),
            name: "vim".to_string(),
            dest: ctx.home().join(".vim"),
            is_file: false,
        },
        &log,
    )
    .unwrap();

    let variant = ctx.store_path().join("vim/default");
    assert!(variant.join("vim").is_dir());
    assert_eq!(
        std::fs::read_link(variant.join("targets/vim")).unwrap(),
        ctx.home().join(".vim")
    );
    assert!(std::fs::symlink_metadata(ctx.home().join(".vim")).is_err());
}

/// `add` needs an explicit variant.
#[test]
fn add_without_variant_fails() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    let log = Logger::new("test");
    commands::create::run(&setup, &ident("vim"), &log).unwrap();

    let result = commands::add::run(
        &setup,
        &AddOpts {
            identifier: "vim".to_string(),
            name: "vimrc".to_string(),
            dest: ctx.home().join(".vimrc"),
            is_file: true,
        },
        &log,
    );
    assert!(result.is_err());
}

// ---------------------------------------------------------------------------
// install / uninstall
// ---------------------------------------------------------------------------

/// Installing a variant links its targets and records each outcome.
#[test]
fn install_links_targets() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);
    let log = Logger::new("test");

    commands::install::run(&setup, &install_opts("vim/default", &[]), &log).unwrap();

    let live = ctx.home().join(".vimrc");
    assert_eq!(std::fs::read_to_string(&live).unwrap(), "default");
    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "vim/default/vimrc");
    assert_eq!(entries[0].status, TargetStatus::Ok);
}

/// Installing another variant switches the live file and the enabled link.
#[test]
fn install_switches_variants() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);

    commands::install::run(&setup, &install_opts("vim/default", &[]), &Logger::new("test"))
        .unwrap();
    commands::install::run(&setup, &install_opts("vim/work", &[]), &Logger::new("test"))
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(ctx.home().join(".vimrc")).unwrap(),
        "work"
    );
    assert_eq!(
        std::fs::read_link(ctx.store_path().join("vim/enabled")).unwrap(),
        ctx.store_path().join("vim/work")
    );
}

/// An unknown target name fails before the enabled link changes.
#[test]
fn install_unknown_target_changes_nothing() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);

    let result = commands::install::run(
        &setup,
        &install_opts("vim/work", &["gvimrc"]),
        &Logger::new("test"),
    );

    assert!(result.is_err());
    assert_eq!(
        std::fs::read_link(ctx.store_path().join("vim/enabled")).unwrap(),
        ctx.store_path().join("vim/default")
    );
    assert!(std::fs::symlink_metadata(ctx.home().join(".vimrc")).is_err());
}

/// A live path holding real data is reported as a failed target and left
/// alone.
#[test]
fn install_over_real_file_fails_that_target() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);
    let live = ctx.write_home_file(".vimrc", "mine");
    let log = Logger::new("test");

    let result = commands::install::run(&setup, &install_opts("vim/default", &[]), &log);

    assert!(result.is_err());
    assert_eq!(log.failure_count(), 1);
    assert_eq!(std::fs::read_to_string(&live).unwrap(), "mine");
}

/// Uninstall removes the install symlinks but keeps content and the enabled
/// link; a second uninstall skips every target.
#[test]
fn uninstall_removes_links() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);
    commands::install::run(&setup, &install_opts("vim/default", &[]), &Logger::new("test"))
        .unwrap();
    let opts = UninstallOpts {
        group: "vim".to_string(),
        targets: Vec::new(),
    };

    commands::uninstall::run(&setup, &opts, &Logger::new("test")).unwrap();

    assert!(std::fs::symlink_metadata(ctx.home().join(".vimrc")).is_err());
    assert!(ctx.store_path().join("vim/default/vimrc").is_file());
    assert!(
        std::fs::symlink_metadata(ctx.store_path().join("vim/enabled"))
            .unwrap()
            .is_symlink()
    );

    let log = Logger::new("test");
    commands::uninstall::run(&setup, &opts, &log).unwrap();
    assert_eq!(log.entries()[0].status, TargetStatus::Skipped);
}

/// `install <group>` puts back the enabled variant after an uninstall.
#[test]
fn install_group_reinstalls_enabled_variant() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);
    commands::enable::run(&setup, &ident("vim/work"), &Logger::new("test")).unwrap();

    commands::install::run(&setup, &install_opts("vim", &[]), &Logger::new("test")).unwrap();

    assert_eq!(
        std::fs::read_to_string(ctx.home().join(".vimrc")).unwrap(),
        "work"
    );
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

/// `show` succeeds for the whole store, a group and a variant, and fails
/// for an unknown group.
#[test]
fn show_identifiers() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);
    let log = Logger::new("test");
    let show = |identifiers: &[&str]| {
        commands::show::run(
            &setup,
            &ShowOpts {
                identifiers: identifiers.iter().map(ToString::to_string).collect(),
            },
            &log,
        )
    };

    assert!(show(&[]).is_ok());
    assert!(show(&["vim"]).is_ok());
    assert!(show(&["vim/work"]).is_ok());
    assert!(show(&["emacs"]).is_err());
    assert!(show(&["vim/home"]).is_err());
}

/// The group table reflects the enabled variant and install state.
#[test]
fn groups_table_after_install() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    vim_with_two_variants(&ctx, &setup);
    commands::install::run(&setup, &install_opts("vim/work", &[]), &Logger::new("test"))
        .unwrap();

    let groups = setup.store.load_all().unwrap();
    let lines = commands::show::groups_table(&groups).aligned();
    assert_eq!(lines.len(), 2);
    let row: Vec<&str> = lines[1].split_whitespace().collect();
    assert_eq!(row, vec!["vim", "work", "2", "true"]);
}

// ---------------------------------------------------------------------------
// config
// ---------------------------------------------------------------------------

/// `config set` writes the settings file and the next setup picks it up.
#[test]
fn config_set_is_persisted() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();

    commands::config::run(
        &setup,
        &ConfigCommand::Set {
            key: "excluded_groups".to_string(),
            value: ".git,scratch".to_string(),
        },
        &Logger::new("test"),
    )
    .unwrap();

    let saved = Config::load(Some(&ctx.settings_path())).unwrap();
    assert_eq!(saved.excluded_groups, vec![".git", "scratch"]);
    // The --path and --terse overrides are not written back.
    assert_eq!(saved.display_mode, DisplayMode::Auto);
    assert_ne!(saved.store_path, ctx.store_path());
    let written = std::fs::read_to_string(ctx.settings_path()).unwrap();
    assert!(!written.contains("store_path"));
    assert!(!written.contains("display_mode"));
    assert_eq!(ctx.setup().config().excluded_groups, vec![".git", "scratch"]);
}

/// Unknown keys are rejected by both `get` and `set`.
#[test]
fn config_unknown_key_fails() {
    let ctx = IntegrationTestContext::new();
    let setup = ctx.setup();
    let log = Logger::new("test");

    assert!(
        commands::config::run(
            &setup,
            &ConfigCommand::Get {
                key: "colour".to_string()
            },
            &log
        )
        .is_err()
    );
    assert!(
        commands::config::run(
            &setup,
            &ConfigCommand::Set {
                key: "colour".to_string(),
                value: "always".to_string()
            },
            &log
        )
        .is_err()
    );
    assert!(!ctx.settings_path().exists());
}
