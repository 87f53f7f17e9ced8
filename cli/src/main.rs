//! Listkeeper CLI - manage the todo list from the shell.
//!
//! This binary operates on the same persisted JSON file as the Listkeeper
//! server, bypassing the HTTP API entirely. A mutation made here is
//! invisible to connected live-update subscribers until they next re-fetch.
//!
//! # Commands
//!
//! - `listkeeper add <title>`: Add a new todo
//! - `listkeeper list`: List all todos
//! - `listkeeper done <id>`: Mark a todo as completed
//! - `listkeeper remove <id>`: Remove a todo
//!
//! # Environment Variables
//!
//! - `LISTKEEPER_DATA_FILE`: Todo file path (default: `todos.json`, the
//!   same default the server uses)

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Result};
use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use listkeeper_store::{Todo, TodoStore};

/// Default data file, shared with the server.
const DEFAULT_DATA_FILE: &str = "todos.json";

/// Listkeeper CLI - manage the todo list from the shell.
///
/// Mutates the same persisted file as the Listkeeper server, directly.
#[derive(Parser, Debug)]
#[command(name = "listkeeper")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "\
ENVIRONMENT VARIABLES:
    LISTKEEPER_DATA_FILE    Todo file path (default: todos.json)

EXAMPLES:
    listkeeper add Buy milk
    listkeeper list
    listkeeper done 1
    listkeeper remove 1
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

/// CLI subcommands, each a single store call plus formatted output.
#[derive(Subcommand, Debug)]
enum Command {
    /// Add a new todo.
    Add {
        /// Task title; multiple words are joined with spaces.
        #[arg(required = true, trailing_var_arg = true)]
        title: Vec<String>,
    },

    /// List all todos.
    List,

    /// Mark a todo as completed.
    Done {
        /// Id of the todo to complete.
        id: String,
    },

    /// Remove a todo.
    Remove {
        /// Id of the todo to remove.
        id: String,
    },

    /// An unrecognized command prints usage and exits zero.
    #[command(external_subcommand)]
    External(Vec<String>),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let store = TodoStore::new(data_file());

    match cli.command {
        Some(Command::Add { title }) => {
            let title = title.join(" ");
            if title.trim().is_empty() {
                bail!("Title is required");
            }
            let todo = store.add(title).await?;
            println!("Added: [{}] {}", todo.id, todo.title);
        }

        Some(Command::List) => {
            let todos = store.list().await?;
            if todos.is_empty() {
                println!("No todos found.");
            } else {
                for todo in &todos {
                    println!("{}", format_todo_line(todo));
                }
            }
        }

        Some(Command::Done { id }) => {
            let id = parse_id(&id)?;
            let Some(todo) = store.mark_done(id).await? else {
                bail!("Todo with ID {id} not found");
            };
            println!("Completed: [{}] {}", todo.id, todo.title);
        }

        Some(Command::Remove { id }) => {
            let id = parse_id(&id)?;
            if !store.remove(id).await? {
                bail!("Todo with ID {id} not found");
            }
            println!("Removed todo with ID {id}");
        }

        // No command or an unrecognized one: usage on stdout, exit zero.
        None | Some(Command::External(_)) => {
            Cli::command().print_long_help()?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Parses an id argument, exiting through the ordinary error path (code 1)
/// rather than a clap usage error when it is not numeric.
fn parse_id(raw: &str) -> Result<u64> {
    match raw.parse() {
        Ok(id) => Ok(id),
        Err(_) => bail!("Valid ID is required"),
    }
}

/// Resolves the data file path, matching the server's default.
fn data_file() -> PathBuf {
    env::var("LISTKEEPER_DATA_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_FILE))
}

/// Formats one todo as a checkbox line: `[x] [3] Buy milk`.
fn format_todo_line(todo: &Todo) -> String {
    let status = if todo.completed { "[x]" } else { "[ ]" };
    format!("{status} [{}] {}", todo.id, todo.title)
}

/// Logging goes to stderr and stays quiet unless RUST_LOG says otherwise.
fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_all_subcommands() {
        assert!(matches!(
            Cli::parse_from(["listkeeper", "add", "Buy", "milk"]).command,
            Some(Command::Add { .. })
        ));
        assert!(matches!(
            Cli::parse_from(["listkeeper", "list"]).command,
            Some(Command::List)
        ));
        assert!(matches!(
            Cli::parse_from(["listkeeper", "done", "3"]).command,
            Some(Command::Done { .. })
        ));
        assert!(matches!(
            Cli::parse_from(["listkeeper", "remove", "3"]).command,
            Some(Command::Remove { .. })
        ));
    }

    #[test]
    fn add_collects_multi_word_titles() {
        let cli = Cli::parse_from(["listkeeper", "add", "Buy", "milk", "today"]);
        match cli.command {
            Some(Command::Add { title }) => assert_eq!(title.join(" "), "Buy milk today"),
            other => panic!("expected Add, got {other:?}"),
        }
    }

    #[test]
    fn parse_id_accepts_numeric_ids() {
        assert_eq!(parse_id("3").unwrap(), 3);
        assert_eq!(parse_id("0").unwrap(), 0);
    }

    #[test]
    fn parse_id_rejects_non_numeric_ids() {
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.to_string(), "Valid ID is required");
        assert!(parse_id("-1").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn missing_id_is_a_parse_error() {
        assert!(Cli::try_parse_from(["listkeeper", "done"]).is_err());
    }

    #[test]
    fn unrecognized_command_is_captured_not_an_error() {
        let cli = Cli::parse_from(["listkeeper", "frobnicate"]);
        assert!(matches!(cli.command, Some(Command::External(_))));
    }

    #[test]
    fn no_command_parses_as_none() {
        let cli = Cli::parse_from(["listkeeper"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn format_todo_line_shows_checkbox_state() {
        let mut todo = Todo::new(3, "Buy milk");
        assert_eq!(format_todo_line(&todo), "[ ] [3] Buy milk");
        todo.complete();
        assert_eq!(format_todo_line(&todo), "[x] [3] Buy milk");
    }
}
