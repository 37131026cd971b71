//! Show the store with the external `tree` program.
use std::path::Path;

use anyhow::{Result, bail};

use super::CommandSetup;
use crate::exec::Executor;
use crate::logging::Logger;

/// Run the tree command.
///
/// # Errors
///
/// Returns an error if `tree` is not installed or fails.
#[allow(clippy::print_stdout)]
pub fn run(setup: &CommandSetup, executor: &dyn Executor, log: &Logger) -> Result<()> {
    log.debug(&format!("running tree on {}", setup.store.root().display()));
    print!("{}", render(setup.store.root(), executor)?);
    Ok(())
}

/// Output of `tree -a -L 4 <root>`.
///
/// # Errors
///
/// Returns an error if `tree` is not installed or fails.
pub fn render(root: &Path, executor: &dyn Executor) -> Result<String> {
    if !executor.which("tree") {
        bail!("`tree` is not installed");
    }
    let args = [
        "-a".to_string(),
        "-L".to_string(),
        "4".to_string(),
        root.display().to_string(),
    ];
    Ok(executor.run("tree", &args)?.stdout)
}
