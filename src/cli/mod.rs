//! Shell-style command interpreter over a single open budget and a scratch ledger.

pub mod core;
pub mod output;
pub mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
