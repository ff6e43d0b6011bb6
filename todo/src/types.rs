//! Domain types for the todo list.
//!
//! A todo list is an ordered sequence of [`Todo`] items. Around it sits the
//! interaction state the front end keeps while the user works: the text
//! typed into the "new todo" input, and the edit dialog.

use crate::store::TodoStore;
use listkeeper_core::version::Version;
use listkeeper_macros::{Action, State};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for a todo item
///
/// Opaque text produced by the store's id generator (`todo-1`, `todo-2`, ...
/// by default). Never reused while the store lives.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    /// Wrap an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TodoId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique, immutable identifier
    pub id: TodoId,
    /// Free-form text shown in the list
    pub content: String,
}

impl Todo {
    /// Creates a todo item
    #[must_use]
    pub fn new(id: TodoId, content: impl Into<String>) -> Self {
        Self {
            id,
            content: content.into(),
        }
    }
}

/// Validation failures reported by todo list operations
///
/// All are recoverable: the list is left untouched and the caller can
/// re-prompt the user.
#[derive(Error, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoError {
    /// `add` was given blank or whitespace-only text
    #[error("Todo text cannot be empty")]
    EmptyInput,

    /// No todo has the given id
    #[error("Todo {0} not found")]
    NotFound(TodoId),

    /// A position outside `[0, len)`
    #[error("Index {index} out of range for list of {len} todos")]
    IndexOutOfRange {
        /// The offending index
        index: usize,
        /// List length at the time of the call
        len: usize,
    },

    /// A prebuilt todo carried an empty id or one already in the list
    #[error("Todo id '{0}' is empty or already in use")]
    InvalidId(TodoId),

    /// The id generator only produced ids already in the list
    #[error("Could not allocate an unused todo id")]
    IdCollision,
}

/// The open edit dialog
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditSession {
    /// Todo being edited
    pub id: TodoId,
    /// Text currently in the dialog, not yet saved
    pub content: String,
}

/// State of the todo app
///
/// Owns the list and the interaction state around it. The revision moves
/// forward on every change a front end would render: applied events and
/// edits to the draft or the edit dialog. Rejected commands only set
/// `last_error` and leave it alone.
#[derive(State, Clone, Debug, Default)]
pub struct TodoAppState {
    /// The ordered list
    pub todos: TodoStore,
    /// Text typed into the "new todo" input
    pub draft: String,
    /// Edit dialog, if open
    pub editor: Option<EditSession>,
    /// Last validation error (if any)
    pub last_error: Option<TodoError>,
    /// Revision of everything above except `last_error`
    #[version]
    pub version: Option<Version>,
}

impl TodoAppState {
    /// Creates app state around an existing store
    #[must_use]
    pub fn new(todos: TodoStore) -> Self {
        Self {
            todos,
            draft: String::new(),
            editor: None,
            last_error: None,
            version: None,
        }
    }

    /// Returns true if the edit dialog is open on `id`
    #[must_use]
    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.editor.as_ref().is_some_and(|session| &session.id == id)
    }
}

/// Actions representing commands and events for the todo app
///
/// Commands come from the front end; the reducer validates them and applies
/// the resulting events. Events can also be fed in directly to replay a
/// known history.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    // ========== Commands ==========
    /// Command: Append a todo with the given text
    #[command]
    AddTodo {
        /// Raw text; trimmed before storing
        text: String,
    },

    /// Command: Remove a todo (no-op if absent)
    #[command]
    DeleteTodo {
        /// Todo to remove
        id: TodoId,
    },

    /// Command: Replace a todo's content
    #[command]
    EditTodo {
        /// Todo to edit
        id: TodoId,
        /// New content, stored as given
        content: String,
    },

    /// Command: Move the todo at `from` to `to`
    #[command]
    ReorderTodo {
        /// Current position
        from: usize,
        /// Position after the move
        to: usize,
    },

    /// Command: The "new todo" input changed
    #[command]
    DraftChanged {
        /// Full input text
        text: String,
    },

    /// Command: Add the draft as a todo
    #[command]
    SubmitDraft,

    /// Command: Open the edit dialog on a todo
    #[command]
    OpenEditor {
        /// Todo to edit
        id: TodoId,
    },

    /// Command: The edit dialog's text changed
    #[command]
    EditorChanged {
        /// Full dialog text
        content: String,
    },

    /// Command: Save the edit dialog and close it
    #[command]
    SaveEditor,

    /// Command: Close the edit dialog without saving
    #[command]
    CloseEditor,

    /// Command: A drag gesture ended
    #[command]
    DragEnded {
        /// Index the drag started at
        source: usize,
        /// Index it was dropped at; `None` when dropped outside the list
        destination: Option<usize>,
    },

    // ========== Events ==========
    /// Event: Todo was appended
    #[event]
    TodoAdded {
        /// The new todo
        todo: Todo,
    },

    /// Event: Todo was removed
    #[event]
    TodoDeleted {
        /// Removed todo
        id: TodoId,
    },

    /// Event: Todo content was replaced
    #[event]
    TodoEdited {
        /// Edited todo
        id: TodoId,
        /// New content
        content: String,
    },

    /// Event: Todo was moved
    #[event]
    TodoMoved {
        /// Previous position
        from: usize,
        /// New position
        to: usize,
    },

    /// Event: Command validation failed
    #[event]
    ValidationFailed {
        /// What went wrong
        error: TodoError,
    },
}
