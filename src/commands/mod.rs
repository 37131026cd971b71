//! One module per subcommand, plus the setup they share.
pub mod add;
pub mod config;
pub mod create;
pub mod enable;
pub mod examples;
pub mod install;
pub mod migrate;
pub mod show;
pub mod tree;
pub mod uninstall;

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::{Config, DisplayMode, file};
use crate::logging::{Logger, TargetStatus};
use crate::store::{ManagedFile, Store};

/// Shared state produced by the common command setup sequence.
///
/// Resolves settings (defaults, settings file, command-line overrides) and
/// opens the store so each command does not repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// The store, carrying the resolved settings.
    pub store: Store,
    /// Whether output is rendered in pretty mode.
    pub pretty: bool,
    /// Location of the settings file, if one can be determined.
    pub settings_path: Option<PathBuf>,
}

impl CommandSetup {
    /// Load settings and open the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings file cannot be read or parsed, or
    /// the store path cannot be resolved.
    pub fn init(global: &GlobalOpts) -> Result<Self> {
        let settings_path = global.config.clone().or_else(file::default_path);
        let mut config = Config::load(settings_path.as_deref()).with_context(|| {
            format!(
                "failed to load settings from {}",
                settings_path
                    .as_deref()
                    .map_or_else(|| "<none>".to_string(), |p| p.display().to_string())
            )
        })?;

        if let Some(path) = &global.path {
            config.store_path.clone_from(path);
        }
        if global.pretty {
            config.display_mode = DisplayMode::Pretty;
        } else if global.terse {
            config.display_mode = DisplayMode::Terse;
        }
        let pretty = config
            .display_mode
            .resolve(std::io::stdout().is_terminal())
            .is_pretty();

        let store = Store::new(config)?;
        Ok(Self {
            store,
            pretty,
            settings_path,
        })
    }

    /// Settings in effect.
    #[must_use]
    pub const fn config(&self) -> &Config {
        self.store.config()
    }
}

/// Apply `action` to each target, recording the outcome, then print the
/// summary.
///
/// A failing target is reported as a warning and the rest still run.
///
/// # Errors
///
/// Returns an error naming the number of failed targets, if any.
pub(crate) fn for_each_target<'a>(
    targets: impl IntoIterator<Item = &'a ManagedFile>,
    prefix: &str,
    verb: &str,
    log: &Logger,
    mut action: impl FnMut(&ManagedFile) -> crate::error::Result<TargetStatus>,
) -> Result<()> {
    for target in targets {
        let label = format!("{prefix}/{}", target.name());
        match action(target) {
            Ok(TargetStatus::Skipped) => {
                log.debug(&format!("skipping target `{label}`, not installed"));
                log.record(&label, TargetStatus::Skipped, Some("not installed"));
            }
            Ok(status) => {
                log.debug(&format!("{verb} target `{label}`"));
                log.record(&label, status, None);
            }
            Err(e) => {
                log.warn(&format!("{verb} target `{label}` failed, skipping: {e}"));
                log.record(&label, TargetStatus::Failed, Some(&e.to_string()));
            }
        }
    }

    log.print_summary();
    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} target(s) failed");
    }
    Ok(())
}

/// `path` made absolute against the working directory, unless it starts
/// with `~`, which is kept for expansion at install time.
pub(crate) fn live_path(path: &Path) -> Result<PathBuf> {
    if path.starts_with("~") {
        return Ok(path.to_path_buf());
    }
    std::path::absolute(path).with_context(|| format!("invalid path {}", path.display()))
}
