//! Add a target to a variant and create its (empty) content.
use std::fs;

use anyhow::{Context as _, Result};

use super::{CommandSetup, live_path};
use crate::cli::AddOpts;
use crate::logging::Logger;
use crate::store::{Identifier, fs as store_fs};

/// Run the add command.
///
/// # Errors
///
/// Returns an error if the variant cannot be loaded, the target cannot be
/// added, or its content cannot be created.
pub fn run(setup: &CommandSetup, opts: &AddOpts, log: &Logger) -> Result<()> {
    let (group_name, variant_name) = Identifier::parse_with_variant(&opts.identifier)?;
    let store = &setup.store;
    let mut group = store
        .load_group(&group_name)
        .with_context(|| format!("unable to load `{group_name}`"))?;
    let variant = group.variant_mut(&variant_name)?;

    let dest = live_path(&opts.dest)?;
    let content = variant
        .add_target(&opts.name, dest, store.config())
        .with_context(|| {
            format!(
                "unable to add target `{}` to `{}`",
                opts.name, opts.identifier
            )
        })?
        .content_path()
        .to_path_buf();

    if store_fs::entry_exists(&content) {
        log.debug(&format!("content {} already exists", content.display()));
    } else if opts.is_file {
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&content)
            .with_context(|| format!("unable to create {}", content.display()))?;
    } else {
        fs::create_dir(&content)
            .with_context(|| format!("unable to create {}", content.display()))?;
    }

    log.success(&format!(
        "Added target `{}` to `{group_name}/{variant_name}`",
        opts.name
    ));
    Ok(())
}
