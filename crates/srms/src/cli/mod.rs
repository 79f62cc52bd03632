//! Command-line interface for srms.
//!
//! This module provides the CLI structure for the `srms` binary and the
//! terminal confirmation prompt used before deletes.

mod commands;

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, OutputFormat,
    SearchCommand, ShowCommand, StatusCommand,
};

use crate::logging::Verbosity;
use crate::session::Confirm;

/// srms - Keep a list of student records
///
/// Add, edit, delete and search student records. Every change is saved
/// immediately to a local database.
#[derive(Debug, Parser)]
#[command(name = "srms")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a student record
    Add(AddCommand),

    /// Edit a student record
    Edit(EditCommand),

    /// Delete a student record
    Delete(DeleteCommand),

    /// List all student records
    List(ListCommand),

    /// Search student records by name
    Search(SearchCommand),

    /// Show one student record
    Show(ShowCommand),

    /// Show storage status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}

/// Asks a yes/no question on a terminal.
///
/// Anything other than `y` or `yes` (any case) counts as no, including end of
/// input and read errors.
#[derive(Debug)]
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    /// Prompt on `output` and read the answer from `input`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirm<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr and read from stdin.
    #[must_use]
    pub fn terminal() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [y/N] ").and_then(|()| self.output.flush()).is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Cursor;

    use crate::record::RecordId;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        assert_eq!(Cli::command().get_name(), "srms");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_flags() {
        assert_eq!(parse(&["srms", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(parse(&["srms", "-v", "list"]).verbosity(), Verbosity::Verbose);
        assert_eq!(parse(&["srms", "-vv", "list"]).verbosity(), Verbosity::Debug);
        assert_eq!(parse(&["srms", "-q", "list"]).verbosity(), Verbosity::Quiet);
    }

    #[test]
    fn test_parse_add() {
        let cli = parse(&[
            "srms", "add", "--name", "Asha", "--roll-no", "1", "--class-grade", "5A", "--cgpa",
            "9.1",
        ]);
        match cli.command {
            Command::Add(cmd) => {
                assert_eq!(cmd.name, "Asha");
                assert_eq!(cmd.roll_no, "1");
                assert_eq!(cmd.class_grade, "5A");
                assert_eq!(cmd.cgpa, "9.1");
            }
            other => panic!("expected add, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_requires_name() {
        let result = Cli::try_parse_from(["srms", "add", "--roll-no", "1", "--class-grade", "5A"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_requires_cgpa() {
        let result = Cli::try_parse_from([
            "srms", "add", "--name", "Asha", "--roll-no", "1", "--class-grade", "5A",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_edit_partial() {
        let cli = parse(&["srms", "edit", "1700000000000", "-g", "6A"]);
        match cli.command {
            Command::Edit(cmd) => {
                assert_eq!(cmd.id, RecordId::new(1_700_000_000_000));
                assert!(cmd.name.is_none());
                assert_eq!(cmd.class_grade.as_deref(), Some("6A"));
            }
            other => panic!("expected edit, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        assert!(Cli::try_parse_from(["srms", "delete", "abc"]).is_err());
        assert!(Cli::try_parse_from(["srms", "show", "-4"]).is_err());
    }

    #[test]
    fn test_parse_delete_yes() {
        let cli = parse(&["srms", "delete", "42", "--yes"]);
        assert!(matches!(cli.command, Command::Delete(DeleteCommand { yes: true, .. })));
    }

    #[test]
    fn test_parse_search_format() {
        let cli = parse(&["srms", "search", "asha", "-f", "json"]);
        match cli.command {
            Command::Search(cmd) => {
                assert_eq!(cmd.query, "asha");
                assert_eq!(cmd.format, OutputFormat::Json);
            }
            other => panic!("expected search, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["srms", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = parse(&["srms", "config", "show", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: true })
        ));
    }

    #[test]
    fn test_prompt_confirm_yes() {
        for answer in ["y\n", "Y\n", "yes\n", "  YES  \n"] {
            let mut out = Vec::new();
            let mut confirm = PromptConfirm::new(Cursor::new(answer), &mut out);
            assert!(confirm.confirm("Delete?"), "answer {answer:?}");
        }
    }

    #[test]
    fn test_prompt_confirm_no() {
        for answer in ["n\n", "\n", "", "nope\n"] {
            let mut out = Vec::new();
            let mut confirm = PromptConfirm::new(Cursor::new(answer), &mut out);
            assert!(!confirm.confirm("Delete?"), "answer {answer:?}");
        }
    }

    #[test]
    fn test_prompt_confirm_writes_prompt() {
        let mut out = Vec::new();
        PromptConfirm::new(Cursor::new("y\n"), &mut out).confirm("Delete this?");
        assert_eq!(String::from_utf8(out).unwrap(), "Delete this? [y/N] ");
    }
}
