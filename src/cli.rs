//! Command-line definitions.
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Top-level CLI entry point.
#[derive(Parser, Debug)]
#[command(
    name = "confs",
    about = "Keep dotfile variants in a store and symlink the enabled one into place",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Override the store directory
    #[arg(long, global = true, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Settings file to use instead of $XDG_CONFIG_HOME/confs/config.toml
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Pretty output (aligned, coloured)
    #[arg(short, long, global = true, conflicts_with = "terse")]
    pub pretty: bool,

    /// Terse output (machine readable)
    #[arg(short, long, global = true)]
    pub terse: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read or change settings
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Add a target to a variant
    Add(AddOpts),
    /// Create a group (with a `default` variant) or a variant
    Create(IdentifierOpts),
    /// Enable a variant without installing it
    Enable(IdentifierOpts),
    /// Enable a variant and install its targets
    Install(InstallOpts),
    /// Uninstall the targets of a group's enabled variant
    Uninstall(UninstallOpts),
    /// Move existing files into a variant and install them in place
    Migrate(MigrateOpts),
    /// List groups, or the targets of the given groups/variants
    Show(ShowOpts),
    /// Show the store as a directory tree (requires `tree`)
    Tree,
    /// Print usage examples
    Examples,
}

/// `config` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Print the value of a setting
    Get {
        /// Setting name
        key: String,
    },
    /// Change a setting and save it to the settings file
    Set {
        /// Setting name
        key: String,
        /// New value (comma-separated for lists)
        value: String,
    },
    /// Print every setting
    Show,
}

/// Options taking a single `group` or `group/variant`.
#[derive(Args, Debug, Clone)]
pub struct IdentifierOpts {
    /// `group` or `group/variant`
    pub identifier: String,
}

/// Options for the `add` subcommand.
#[derive(Args, Debug, Clone)]
pub struct AddOpts {
    /// `group/variant` to add the target to
    pub identifier: String,
    /// Name of the target inside the variant
    pub name: String,
    /// Where the target is installed, e.g. ~/.vimrc
    pub dest: PathBuf,
    /// Create an empty file instead of a directory as the content
    #[arg(short = 'f', long = "is-file")]
    pub is_file: bool,
}

/// Options for the `install` subcommand.
#[derive(Args, Debug, Clone)]
pub struct InstallOpts {
    /// `group/variant` to install
    pub identifier: String,
    /// Only install these targets
    pub targets: Vec<String>,
}

/// Options for the `uninstall` subcommand.
#[derive(Args, Debug, Clone)]
pub struct UninstallOpts {
    /// Group whose enabled variant is uninstalled
    pub group: String,
    /// Only uninstall these targets
    pub targets: Vec<String>,
}

/// Options for the `migrate` subcommand.
#[derive(Args, Debug, Clone)]
pub struct MigrateOpts {
    /// `group/variant` to migrate into
    pub identifier: String,
    /// Files or directories to migrate
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,
}

/// Options for the `show` subcommand.
#[derive(Args, Debug, Clone)]
pub struct ShowOpts {
    /// Groups or variants to show in detail
    pub identifiers: Vec<String>,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Add(_) => "add",
            Self::Create(_) => "create",
            Self::Enable(_) => "enable",
            Self::Install(_) => "install",
            Self::Uninstall(_) => "uninstall",
            Self::Migrate(_) => "migrate",
            Self::Show(_) => "show",
            Self::Tree => "tree",
            Self::Examples => "examples",
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_path_override() {
        let cli = Cli::parse_from(["confs", "--path", "/tmp/store", "show"]);
        assert_eq!(cli.global.path, Some(PathBuf::from("/tmp/store")));
        assert!(matches!(cli.command, Command::Show(_)));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["confs", "show", "-v", "-t"]);
        assert!(cli.verbose);
        assert!(cli.global.terse);
    }

    #[test]
    fn pretty_conflicts_with_terse() {
        assert!(Cli::try_parse_from(["confs", "-p", "-t", "show"]).is_err());
    }

    #[test]
    fn parse_add_is_file() {
        let cli = Cli::parse_from(["confs", "add", "vim/default", "vimrc", "~/.vimrc", "-f"]);
        let Command::Add(opts) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(opts.identifier, "vim/default");
        assert_eq!(opts.name, "vimrc");
        assert_eq!(opts.dest, PathBuf::from("~/.vimrc"));
        assert!(opts.is_file);
    }

    #[test]
    fn parse_install_with_targets() {
        let cli = Cli::parse_from(["confs", "install", "vim/work", "vimrc", "vim"]);
        let Command::Install(opts) = cli.command else {
            panic!("expected install");
        };
        assert_eq!(opts.targets, vec!["vimrc", "vim"]);
    }

    #[test]
    fn migrate_requires_paths() {
        assert!(Cli::try_parse_from(["confs", "migrate", "vim/default"]).is_err());
    }

    #[test]
    fn parse_config_set() {
        let cli = Cli::parse_from(["confs", "config", "set", "display_mode", "terse"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Set { ref key, ref value })
                if key == "display_mode" && value == "terse"
        ));
    }

    #[test]
    fn command_names() {
        let cli = Cli::parse_from(["confs", "tree"]);
        assert_eq!(cli.command.name(), "tree");
    }
}
