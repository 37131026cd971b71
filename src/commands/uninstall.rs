//! Uninstall the targets of a group's enabled variant.
use anyhow::{Context as _, Result};

use super::install::selected;
use super::{CommandSetup, for_each_target};
use crate::cli::UninstallOpts;
use crate::logging::{Logger, TargetStatus};

/// Run the uninstall command.
///
/// Targets that are not installed are skipped. The enabled link is kept, so
/// `confs install <group>` puts everything back.
///
/// # Errors
///
/// Returns an error if the group or a named target does not exist, or any
/// target fails to uninstall.
pub fn run(setup: &CommandSetup, opts: &UninstallOpts, log: &Logger) -> Result<()> {
    let group = setup
        .store
        .load_group(&opts.group)
        .with_context(|| format!("unable to load `{}`", opts.group))?;
    let Some(variant) = group.enabled() else {
        log.warn(&format!("`{}` has no enabled variant", group.name()));
        return Ok(());
    };

    let prefix = format!("{}/{}", group.name(), variant.name());
    let targets = selected(&group, variant.name(), &opts.targets)?;
    for_each_target(targets, &prefix, "uninstall", log, |target| {
        if !target.is_installed() {
            return Ok(TargetStatus::Skipped);
        }
        target.uninstall().map(|()| TargetStatus::Ok)
    })?;

    log.success(&format!("Uninstalled `{prefix}`"));
    Ok(())
}
