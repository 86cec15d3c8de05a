//! QueryBench terminal workbench
//!
//! Wires the MySQL gateway, the query session controller and the completion
//! catalog together behind a line-oriented shell.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod render;
pub mod shell;

pub use cli::Args;
pub use commands::{CommandError, ShellCommand, parse_command};
pub use shell::{Reply, Shell, run};
