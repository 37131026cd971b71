//! Create a group or a variant.
use anyhow::Result;

use super::CommandSetup;
use crate::cli::IdentifierOpts;
use crate::logging::Logger;
use crate::store::{DEFAULT_VARIANT, Identifier};

/// Run the create command.
///
/// # Errors
///
/// Returns an error if the identifier is invalid, the group or variant
/// already exists, or the store cannot be written.
pub fn run(setup: &CommandSetup, opts: &IdentifierOpts, log: &Logger) -> Result<()> {
    let identifier = Identifier::parse(&opts.identifier)?;
    let (group, created) = setup.store.create(&identifier)?;
    let variant = identifier.variant.as_deref().unwrap_or(DEFAULT_VARIANT);

    if created {
        log.success(&format!("Created group `{}`", group.name()));
    }
    log.success(&format!("Created `{}/{variant}`", group.name()));
    Ok(())
}
