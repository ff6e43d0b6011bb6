//! Reducer logic for the todo app.
//!
//! List commands are validated against the [`TodoStore`](crate::TodoStore),
//! turned into events and applied. Session commands (draft input, edit
//! dialog, drag end) update interaction state and, where they amount to a
//! list change, send the matching list command as a follow-up effect.

use crate::types::{EditSession, TodoAction, TodoAppState, TodoError, TodoId};
use listkeeper_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};

/// Reducer for the todo app
#[derive(Clone, Debug)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates an `EditTodo` command
    fn validate_edit_todo(state: &TodoAppState, id: &TodoId) -> Result<(), TodoError> {
        if state.todos.contains(id) {
            Ok(())
        } else {
            Err(TodoError::NotFound(id.clone()))
        }
    }

    /// Validates a `ReorderTodo` command
    fn validate_reorder_todo(state: &TodoAppState, from: usize, to: usize) -> Result<(), TodoError> {
        state.todos.check_index(from)?;
        state.todos.check_index(to)
    }

    fn reject(state: &mut TodoAppState, error: TodoError) {
        tracing::debug!(%error, "Command rejected");
        Self::apply_event(state, &TodoAction::ValidationFailed { error });
    }

    /// Applies an event to state
    fn apply_event(state: &mut TodoAppState, action: &TodoAction) {
        match action {
            TodoAction::TodoAdded { todo } => {
                if let Err(error) = state.todos.insert(todo.clone()) {
                    tracing::warn!(id = %todo.id, %error, "Replayed TodoAdded could not be applied");
                    Self::reject(state, error);
                    return;
                }
            },
            TodoAction::TodoDeleted { id } => {
                state.todos.delete(id);
                if state.is_editing(id) {
                    state.editor = None;
                }
            },
            TodoAction::TodoEdited { id, content } => {
                if let Err(error) = state.todos.edit(id, content.clone()) {
                    tracing::warn!(%error, "Replayed TodoEdited could not be applied");
                    return;
                }
            },
            TodoAction::TodoMoved { from, to } => {
                if let Err(error) = state.todos.reorder(*from, *to) {
                    tracing::warn!(%error, "Replayed TodoMoved could not be applied");
                    return;
                }
            },
            TodoAction::ValidationFailed { error } => {
                state.last_error = Some(error.clone());
                return;
            },
            // Commands are not applied to state
            TodoAction::AddTodo { .. }
            | TodoAction::DeleteTodo { .. }
            | TodoAction::EditTodo { .. }
            | TodoAction::ReorderTodo { .. }
            | TodoAction::DraftChanged { .. }
            | TodoAction::SubmitDraft
            | TodoAction::OpenEditor { .. }
            | TodoAction::EditorChanged { .. }
            | TodoAction::SaveEditor
            | TodoAction::CloseEditor
            | TodoAction::DragEnded { .. } => return,
        }

        state.last_error = None;
        let version = state.bump_version();
        tracing::trace!(event = action.event_type(), %version, "Event applied");
    }

    /// Records a change to the draft or the edit dialog
    fn touch(state: &mut TodoAppState) {
        let version = state.bump_version();
        tracing::trace!(%version, "Session state changed");
    }

    /// Adds `text` as a todo, returning whether it was added
    fn add(state: &mut TodoAppState, text: &str) -> bool {
        match state.todos.prepare(text) {
            Ok(todo) => {
                Self::apply_event(state, &TodoAction::TodoAdded { todo });
                true
            },
            Err(error) => {
                Self::reject(state, error);
                false
            },
        }
    }
}

impl Default for TodoReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Reducer for TodoReducer {
    type State = TodoAppState;
    type Action = TodoAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        tracing::trace!(action = action.name(), "Reducing");

        match action {
            // ========== List commands ==========
            TodoAction::AddTodo { text } => {
                Self::add(state, &text);
                SmallVec::new()
            },

            TodoAction::DeleteTodo { id } => {
                // Absent ids are ignored so a double click is harmless
                if state.todos.contains(&id) {
                    Self::apply_event(state, &TodoAction::TodoDeleted { id });
                }
                SmallVec::new()
            },

            TodoAction::EditTodo { id, content } => {
                if let Err(error) = Self::validate_edit_todo(state, &id) {
                    Self::reject(state, error);
                    return SmallVec::new();
                }

                Self::apply_event(state, &TodoAction::TodoEdited { id, content });
                SmallVec::new()
            },

            TodoAction::ReorderTodo { from, to } => {
                if let Err(error) = Self::validate_reorder_todo(state, from, to) {
                    Self::reject(state, error);
                    return SmallVec::new();
                }

                if from != to {
                    Self::apply_event(state, &TodoAction::TodoMoved { from, to });
                }
                SmallVec::new()
            },

            // ========== Session commands ==========
            TodoAction::DraftChanged { text } => {
                if state.draft != text {
                    state.draft = text;
                    Self::touch(state);
                }
                SmallVec::new()
            },

            TodoAction::SubmitDraft => {
                let draft = std::mem::take(&mut state.draft);
                if !Self::add(state, &draft) {
                    // Keep what the user typed so they can fix it
                    state.draft = draft;
                }
                SmallVec::new()
            },

            TodoAction::OpenEditor { id } => {
                let Some(todo) = state.todos.get(&id) else {
                    Self::reject(state, TodoError::NotFound(id));
                    return SmallVec::new();
                };

                state.editor = Some(EditSession {
                    content: todo.content.clone(),
                    id,
                });
                Self::touch(state);
                SmallVec::new()
            },

            TodoAction::EditorChanged { content } => {
                let changed = match state.editor.as_mut() {
                    Some(session) if session.content != content => {
                        session.content = content;
                        true
                    },
                    _ => false,
                };
                if changed {
                    Self::touch(state);
                }
                SmallVec::new()
            },

            TodoAction::SaveEditor => match state.editor.take() {
                Some(EditSession { id, content }) => {
                    Self::touch(state);
                    smallvec![Effect::Send(TodoAction::EditTodo { id, content })]
                },
                None => SmallVec::new(),
            },

            TodoAction::CloseEditor => {
                if state.editor.take().is_some() {
                    Self::touch(state);
                }
                SmallVec::new()
            },

            TodoAction::DragEnded {
                source,
                destination,
            } => match destination {
                Some(to) if to != source => {
                    smallvec![Effect::Send(TodoAction::ReorderTodo { from: source, to })]
                },
                // Dropped outside the list or back where it started
                _ => SmallVec::new(),
            },

            // ========== Events ==========
            TodoAction::TodoAdded { .. }
            | TodoAction::TodoDeleted { .. }
            | TodoAction::TodoEdited { .. }
            | TodoAction::TodoMoved { .. }
            | TodoAction::ValidationFailed { .. } => {
                // Events fed in directly are being replayed
                Self::apply_event(state, &action);
                SmallVec::new()
            },
        }
    }
}
