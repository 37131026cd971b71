//! Switch a group to a variant and install its targets.
use anyhow::{Context as _, Result};

use super::{CommandSetup, for_each_target};
use crate::cli::InstallOpts;
use crate::logging::{Logger, TargetStatus};
use crate::store::{ConfigGroup, Identifier, ManagedFile};

/// Run the install command.
///
/// The currently enabled variant is uninstalled first, the identified one is
/// enabled, then all of its targets (or only the named ones) are installed.
/// `group` alone reinstalls the enabled variant.
///
/// # Errors
///
/// Returns an error if the variant or a named target does not exist, the
/// previous variant cannot be uninstalled, or any target fails to install.
pub fn run(setup: &CommandSetup, opts: &InstallOpts, log: &Logger) -> Result<()> {
    let identifier = Identifier::parse(&opts.identifier)?;
    let config = setup.config();
    let mut group = setup
        .store
        .load_group(&identifier.group)
        .with_context(|| format!("unable to load `{}`", identifier.group))?;

    let variant_name = match identifier.variant {
        Some(name) => name,
        None => group
            .enabled()
            .map(|v| v.name().to_string())
            .with_context(|| format!("`{}` has no enabled variant", group.name()))?,
    };
    // Unknown variants and targets fail before anything is touched.
    group
        .variant(&variant_name)?
        .select_targets(&opts.targets)?;

    if let Some(previous) = group.enabled() {
        previous.uninstall().with_context(|| {
            format!(
                "failed to uninstall previously installed `{}/{}`",
                group.name(),
                previous.name()
            )
        })?;
        log.success(&format!(
            "Uninstalled previously installed `{}/{}`",
            group.name(),
            previous.name()
        ));
    }

    group.enable_variant(&variant_name)?;
    group.save(config)?;
    log.success(&format!("Enabled `{}/{variant_name}`", group.name()));

    let prefix = format!("{}/{variant_name}", group.name());
    let targets = selected(&group, &variant_name, &opts.targets)?;
    for_each_target(targets, &prefix, "install", log, |target| {
        if !target.has_content() {
            log.warn(&format!(
                "content {} of `{prefix}/{}` is missing",
                target.content_path().display(),
                target.name()
            ));
        }
        target.install().map(|()| TargetStatus::Ok)
    })?;

    log.success(&format!("Installed `{prefix}`"));
    Ok(())
}

/// The named targets of `variant`, or all of them when `names` is empty.
pub(crate) fn selected<'a>(
    group: &'a ConfigGroup,
    variant: &str,
    names: &[String],
) -> Result<Vec<&'a ManagedFile>> {
    let variant = group.variant(variant)?;
    if names.is_empty() {
        return Ok(variant.targets().iter().collect());
    }
    Ok(variant.select_targets(names)?)
}
