pub mod commands;
pub mod core;
pub mod help;
pub mod output;
pub mod presenter;
pub mod registry;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, LoopControl, ShellContext};
pub use presenter::TextPresenter;
pub use shell::{run_cli, SCRIPT_ENV};
