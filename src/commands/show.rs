//! Tables of groups, variants and targets.
use anyhow::{Result, bail};

use super::CommandSetup;
use crate::cli::ShowOpts;
use crate::logging::Logger;
use crate::output::{Align, Table, heading};
use crate::store::{ConfigGroup, Identifier, Variant};

/// Run the show command.
///
/// Without identifiers, prints one row per group. Otherwise prints the
/// targets of each identified variant, or of every variant of each
/// identified group.
///
/// # Errors
///
/// Returns an error if the store cannot be loaded or an identifier does not
/// name an existing group or variant.
#[allow(clippy::print_stdout)]
pub fn run(setup: &CommandSetup, opts: &ShowOpts, log: &Logger) -> Result<()> {
    let groups = setup.store.load_all()?;
    log.debug(&format!(
        "loaded {} groups from {}",
        groups.len(),
        setup.store.root().display()
    ));

    if opts.identifiers.is_empty() {
        groups_table(&groups).print(setup.pretty);
        return Ok(());
    }

    for raw in &opts.identifiers {
        let identifier = Identifier::parse(raw)?;
        let Some(group) = groups.iter().find(|g| g.name() == identifier.group) else {
            bail!("no group named `{}`", identifier.group);
        };
        let variants: Vec<&Variant> = match &identifier.variant {
            Some(name) => vec![group.variant(name)?],
            None => group.variants().iter().collect(),
        };
        for variant in variants {
            println!(
                "{}",
                heading(&format!("{}/{}:", group.name(), variant.name()), setup.pretty)
            );
            targets_table(variant).print(setup.pretty);
        }
    }
    Ok(())
}

/// One row per group: name, enabled variant, number of variants, and
/// whether any target of the enabled variant is installed.
#[must_use]
pub fn groups_table(groups: &[ConfigGroup]) -> Table {
    let mut table =
        Table::new(&["Group", "Enabled", "Variants", "Installed"]).align(2, Align::Right);
    for group in groups {
        let installed = group
            .enabled()
            .is_some_and(|v| v.targets().iter().any(|t| t.is_installed()));
        table.push(
            vec![
                group.name().to_string(),
                group.enabled().map_or_else(String::new, |v| v.name().to_string()),
                group.variants().len().to_string(),
                installed.to_string(),
            ],
            installed,
        );
    }
    table
}

/// One row per target: name, live path, and whether it is installed.
#[must_use]
pub fn targets_table(variant: &Variant) -> Table {
    let mut table = Table::new(&["Name", "Target dest", "Installed"]);
    for target in variant.targets() {
        let installed = target.is_installed();
        table.push(
            vec![
                target.name().to_string(),
                target.live_path().display().to_string(),
                installed.to_string(),
            ],
            installed,
        );
    }
    table
}
