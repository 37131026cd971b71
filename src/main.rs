//! `confs` command-line entry point.
use anyhow::Result;
use clap::Parser;

use confs::cli::{self, Command};
use confs::commands::{self, CommandSetup};
use confs::exec::SystemExecutor;
use confs::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let setup = CommandSetup::init(&args.global)?;

    let name = args.command.name();
    logging::init_subscriber(args.verbose, setup.pretty, name);
    let log = Logger::new(name);

    match &args.command {
        Command::Config(cmd) => commands::config::run(&setup, cmd, &log),
        Command::Add(opts) => commands::add::run(&setup, opts, &log),
        Command::Create(opts) => commands::create::run(&setup, opts, &log),
        Command::Enable(opts) => commands::enable::run(&setup, opts, &log),
        Command::Install(opts) => commands::install::run(&setup, opts, &log),
        Command::Uninstall(opts) => commands::uninstall::run(&setup, opts, &log),
        Command::Migrate(opts) => commands::migrate::run(&setup, opts, &log),
        Command::Show(opts) => commands::show::run(&setup, opts, &log),
        Command::Tree => commands::tree::run(&setup, &SystemExecutor, &log),
        Command::Examples => {
            commands::examples::run();
            Ok(())
        }
    }
}
