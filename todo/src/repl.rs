//! Line-oriented front end.
//!
//! Parses one command per line into a [`TodoAction`] (or a view command)
//! and renders the list back as text. The terminal stands in for the
//! browser: `type`/`submit` is the new-todo input, `edit`/`set`/`save`/
//! `close` the edit dialog, and `mv`/`drop` the end of a drag gesture.

use crate::types::{TodoAction, TodoAppState, TodoId};
use std::fmt::{self, Write};
use std::str::FromStr;
use thiserror::Error;

/// Usage text printed by `help`.
pub const HELP: &str = "\
Commands (indices start at 0):
  add <text>        add a todo
  type <text>       fill the new-todo input
  submit            add the new-todo input as a todo
  rm <id>           delete a todo
  edit <id>         open the edit dialog
  set <text>        replace the dialog text
  save              save the dialog
  close             close the dialog without saving
  mv <from> <to>    drag a todo from one position to another
  drop <from>       drag a todo and release it outside the list
  ls                show the list
  json              show the list as JSON
  help              show this help
  quit              exit";

/// Command parse failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    #[error("Empty command")]
    Empty,

    /// First word is not a known command
    #[error("Unknown command '{0}' (try 'help')")]
    UnknownCommand(String),

    /// A required argument is missing
    #[error("'{command}' needs {argument}")]
    MissingArgument {
        /// Command name
        command: &'static str,
        /// What is missing
        argument: &'static str,
    },

    /// An index argument is not a non-negative integer
    #[error("'{0}' is not a list position")]
    InvalidIndex(String),
}

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Something to send to the store
    Dispatch(TodoAction),
    /// Print the list
    List,
    /// Print the list as JSON
    Json,
    /// Print usage
    Help,
    /// Exit
    Quit,
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_start();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));

        let action = match word {
            "" => return Err(ParseError::Empty),
            "ls" | "list" => return Ok(Self::List),
            "json" => return Ok(Self::Json),
            "help" | "?" => return Ok(Self::Help),
            "quit" | "exit" | "q" => return Ok(Self::Quit),

            // `add` and `type` keep the raw text; trimming is the store's job
            "add" => TodoAction::AddTodo {
                text: rest.to_string(),
            },
            "type" => TodoAction::DraftChanged {
                text: rest.to_string(),
            },
            "submit" => TodoAction::SubmitDraft,
            "rm" | "del" | "delete" => TodoAction::DeleteTodo {
                id: id_arg("rm", rest)?,
            },
            "edit" => TodoAction::OpenEditor {
                id: id_arg("edit", rest)?,
            },
            "set" => TodoAction::EditorChanged {
                content: rest.to_string(),
            },
            "save" => TodoAction::SaveEditor,
            "close" | "cancel" => TodoAction::CloseEditor,
            "mv" | "move" => {
                let mut args = rest.split_whitespace();
                let from = index_arg("mv", "a source position", args.next())?;
                let to = index_arg("mv", "a destination position", args.next())?;
                TodoAction::DragEnded {
                    source: from,
                    destination: Some(to),
                }
            },
            "drop" => TodoAction::DragEnded {
                source: index_arg("drop", "a source position", rest.split_whitespace().next())?,
                destination: None,
            },
            other => return Err(ParseError::UnknownCommand(other.to_string())),
        };

        Ok(Self::Dispatch(action))
    }
}

fn id_arg(command: &'static str, rest: &str) -> Result<TodoId, ParseError> {
    rest.split_whitespace()
        .next()
        .map(TodoId::from)
        .ok_or(ParseError::MissingArgument {
            command,
            argument: "a todo id",
        })
}

fn index_arg(command: &'static str, argument: &'static str, raw: Option<&str>) -> Result<usize, ParseError> {
    let raw = raw.ok_or(ParseError::MissingArgument { command, argument })?;
    raw.parse()
        .map_err(|_| ParseError::InvalidIndex(raw.to_string()))
}

/// Render the list and any open input as text
#[must_use]
pub fn render(state: &TodoAppState) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    if write_listing(&mut out, state).is_err() {
        tracing::warn!("Rendering the list failed");
    }
    out
}

fn write_listing(out: &mut impl Write, state: &TodoAppState) -> fmt::Result {
    if state.todos.is_empty() {
        writeln!(out, "(no todos)")?;
    }
    for (index, todo) in state.todos.list().iter().enumerate() {
        writeln!(out, "{index:>3}. [{}] {}", todo.id, todo.content)?;
    }
    if !state.draft.is_empty() {
        writeln!(out, "new todo: {:?}", state.draft)?;
    }
    if let Some(session) = &state.editor {
        writeln!(out, "editing {}: {:?}", session.id, session.content)?;
    }
    Ok(())
}

/// Render the list as pretty-printed JSON
///
/// # Errors
///
/// Returns the serializer error, which cannot happen for well-formed todos.
pub fn render_json(state: &TodoAppState) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(state.todos.list())
}
