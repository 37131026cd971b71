//! Point a group's enabled link at another variant.
use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::IdentifierOpts;
use crate::logging::Logger;
use crate::store::Identifier;

/// Run the enable command.
///
/// Only the enabled link changes; installed targets are left alone.
///
/// # Errors
///
/// Returns an error if the identifier does not name an existing variant or
/// the link cannot be written.
pub fn run(setup: &CommandSetup, opts: &IdentifierOpts, log: &Logger) -> Result<()> {
    let identifier = Identifier::parse(&opts.identifier)?;
    setup
        .store
        .enable(&identifier)
        .with_context(|| format!("unable to enable `{identifier}`"))?;
    log.success(&format!("Enabled `{identifier}`"));
    Ok(())
}
