//! `config get | set | show`.
use std::path::Path;

use anyhow::{Context as _, Result};

use super::CommandSetup;
use crate::cli::ConfigCommand;
use crate::config::{Config, ConfigKey, file};
use crate::logging::Logger;
use crate::output::Table;

/// Run the config command.
///
/// # Errors
///
/// Returns an error for an unknown key, an invalid value, or a settings file
/// that cannot be read or written.
#[allow(clippy::print_stdout)]
pub fn run(setup: &CommandSetup, command: &ConfigCommand, log: &Logger) -> Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            let key: ConfigKey = key.parse()?;
            println!("{}", setup.config().get(key));
        }
        ConfigCommand::Set { key, value } => {
            let path = setup
                .settings_path
                .as_deref()
                .context("no settings file location; pass --config")?;
            let config = set(path, key, value)?;
            let key: ConfigKey = key.parse()?;
            log.success(&format!("{key} = {}", config.get(key)));
            log.debug(&format!("saved {}", path.display()));
        }
        ConfigCommand::Show => table(setup.config()).print(setup.pretty),
    }
    Ok(())
}

/// Change `key` in the settings file at `path` and save it.
///
/// Only the fields already present in the file plus `key` are written, so
/// defaults and command-line overrides are not frozen into it.
///
/// # Errors
///
/// Returns an error for an unknown key, an invalid value, or a settings file
/// that cannot be read or written.
pub fn set(path: &Path, key: &str, value: &str) -> Result<Config> {
    let key: ConfigKey = key.parse()?;
    let mut settings = file::read(path)?;
    let mut config = Config::default();
    settings.clone().apply(&mut config)?;
    config.set(key, value)?;
    settings.assign(key, &config);
    file::write(path, &settings)?;
    Ok(config)
}

/// Key/value table of every setting.
#[must_use]
pub fn table(config: &Config) -> Table {
    let mut table = Table::new(&["Key", "Value"]);
    for (key, value) in config.entries() {
        table.push(vec![key.to_string(), value], false);
    }
    table
}
