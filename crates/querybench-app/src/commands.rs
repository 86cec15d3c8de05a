//! Shell input parsing
//!
//! Lines starting with `:` are shell commands; anything else is SQL.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Select a database and reload the completion catalog
    Use(String),
    /// Select a connection profile
    Connection(String),
    Cancel,
    /// Show history, optionally only entries whose SQL contains the filter
    History(Option<String>),
    /// Print suggestions for the text as text-before-cursor
    Complete(String),
    Databases,
    /// Paginate following submissions, or stop paginating
    Page(Option<(u32, u32)>),
    Clear,
    Help,
    Quit,
    Submit(String),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command ':{0}' (type :help for a list)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),
}

pub const HELP: &str = "\
:use <db>           select database
:connection <id>    select connection profile
:cancel             cancel the running query
:history [text]     show query history, optionally filtered
:complete <text>    show completions for <text>
:databases          list databases
:page <n> <size>    paginate following queries (:page off to stop)
:clear              clear the current result and error
:help               show this help
:quit               exit
anything else       run as SQL";

pub fn parse_command(line: &str) -> Result<ShellCommand, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.trim_start().strip_prefix(':') else {
        return Ok(if line.trim().is_empty() {
            ShellCommand::Empty
        } else {
            ShellCommand::Submit(line.trim().to_string())
        });
    };

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args),
        None => (rest, ""),
    };

    match name {
        // Completion text is kept verbatim; trailing whitespace changes the context.
        "complete" => Ok(ShellCommand::Complete(args.to_string())),
        "use" => single_arg(args, ":use <db>").map(ShellCommand::Use),
        "connection" => single_arg(args, ":connection <id>").map(ShellCommand::Connection),
        "page" => parse_page(args),
        "cancel" => Ok(ShellCommand::Cancel),
        "history" => Ok(ShellCommand::History(
            Some(args.trim()).filter(|filter| !filter.is_empty()).map(str::to_string),
        )),
        "databases" => Ok(ShellCommand::Databases),
        "clear" => Ok(ShellCommand::Clear),
        "help" => Ok(ShellCommand::Help),
        "quit" | "exit" | "q" => Ok(ShellCommand::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn single_arg(args: &str, usage: &'static str) -> Result<String, CommandError> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(arg), None) => Ok(arg.to_string()),
        _ => Err(CommandError::Usage(usage)),
    }
}

fn parse_page(args: &str) -> Result<ShellCommand, CommandError> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    match parts.as_slice() {
        ["off"] => Ok(ShellCommand::Page(None)),
        [page, size] => {
            let page = parse_number(page)?;
            let size = parse_number(size)?;
            if size == 0 {
                return Err(CommandError::Usage(":page <n> <size> with size > 0"));
            }
            Ok(ShellCommand::Page(Some((page, size))))
        }
        _ => Err(CommandError::Usage(":page <n> <size> | :page off")),
    }
}

fn parse_number(text: &str) -> Result<u32, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sql_lines_are_submitted() {
        assert_eq!(
            parse_command("SELECT * FROM users\r\n"),
            Ok(ShellCommand::Submit("SELECT * FROM users".to_string()))
        );
        assert_eq!(parse_command("   "), Ok(ShellCommand::Empty));
    }

    #[test]
    fn test_commands_with_arguments() {
        assert_eq!(
            parse_command(":use shop"),
            Ok(ShellCommand::Use("shop".to_string()))
        );
        assert_eq!(
            parse_command(":connection  local "),
            Ok(ShellCommand::Connection("local".to_string()))
        );
        assert_eq!(
            parse_command(":use"),
            Err(CommandError::Usage(":use <db>"))
        );
        assert_eq!(
            parse_command(":use a b"),
            Err(CommandError::Usage(":use <db>"))
        );
    }

    #[test]
    fn test_complete_keeps_trailing_whitespace() {
        assert_eq!(
            parse_command(":complete SELECT * FROM "),
            Ok(ShellCommand::Complete("SELECT * FROM ".to_string()))
        );
        assert_eq!(
            parse_command(":complete"),
            Ok(ShellCommand::Complete(String::new()))
        );
    }

    #[test]
    fn test_page() {
        assert_eq!(
            parse_command(":page 2 50"),
            Ok(ShellCommand::Page(Some((2, 50))))
        );
        assert_eq!(parse_command(":page off"), Ok(ShellCommand::Page(None)));
        assert_eq!(
            parse_command(":page x 50"),
            Err(CommandError::InvalidNumber("x".to_string()))
        );
        assert!(parse_command(":page 1 0").is_err());
        assert!(parse_command(":page 1").is_err());
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command(":cancel"), Ok(ShellCommand::Cancel));
        assert_eq!(parse_command(":history"), Ok(ShellCommand::History(None)));
        assert_eq!(
            parse_command(":history  from users "),
            Ok(ShellCommand::History(Some("from users".to_string())))
        );
        assert_eq!(parse_command(":databases"), Ok(ShellCommand::Databases));
        assert_eq!(parse_command(":clear"), Ok(ShellCommand::Clear));
        assert_eq!(parse_command(":q"), Ok(ShellCommand::Quit));
        assert_eq!(
            parse_command(":frobnicate"),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}
