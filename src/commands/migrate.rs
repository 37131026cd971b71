//! Move existing files into a variant and install them in place.
use std::slice;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::MigrateOpts;
use crate::logging::Logger;
use crate::store::Identifier;

/// Run the migrate command.
///
/// Paths are migrated one at a time; the first failure stops the command
/// after that path has been rolled back.
///
/// # Errors
///
/// Returns an error if the identifier does not name an existing variant or
/// a path cannot be migrated.
pub fn run(setup: &CommandSetup, opts: &MigrateOpts, log: &Logger) -> Result<()> {
    let (group, variant) = Identifier::parse_with_variant(&opts.identifier)?;
    let identifier = Identifier {
        group,
        variant: Some(variant),
    };

    for path in &opts.paths {
        log.debug(&format!("migrating {}", path.display()));
        setup
            .store
            .migrate(&identifier, slice::from_ref(path))
            .with_context(|| {
                format!("unable to migrate {} to `{identifier}`", path.display())
            })?;
        log.success(&format!("Migrated {} to `{identifier}`", path.display()));
    }
    Ok(())
}
