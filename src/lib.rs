//! Configuration file switcher.
//!
//! Dotfiles live in a store (default `~/.confs`) as groups of named
//! variants; installing a variant replaces each live path with a symlink
//! into the store, so switching between e.g. `vim/default` and `vim/work`
//! never copies a file.
//!
//! - **[`store`]**: the on-disk model (load, mutate, save) with install,
//!   uninstall and migrate
//! - **[`config`]**: settings and the optional settings file
//! - **[`commands`]**: one module per subcommand of the `confs` binary
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod output;
pub mod store;
