//! The ordered todo list.
//!
//! [`TodoStore`] owns the sequence of todos and is the only thing that
//! mutates it. Insertion order is display order.

use crate::types::{Todo, TodoError, TodoId};
use listkeeper_core::environment::{IdGenerator, SequentialIdGenerator};
use std::sync::Arc;

/// Prefix of ids produced by the default generator.
pub const DEFAULT_ID_PREFIX: &str = "todo-";

/// Ordered, id-unique sequence of todos
///
/// Cloning a store shares its id generator, so todos added to either clone
/// still get distinct ids.
///
/// # Example
///
/// ```
/// use todo::TodoStore;
///
/// let mut store = TodoStore::default();
/// let milk = store.add("  Buy milk ")?;
/// store.add("Walk dog")?;
/// store.reorder(1, 0)?;
///
/// let contents: Vec<&str> = store.list().iter().map(|t| t.content.as_str()).collect();
/// assert_eq!(contents, ["Walk dog", "Buy milk"]);
///
/// store.delete(&milk.id);
/// assert_eq!(store.len(), 1);
/// # Ok::<(), todo::TodoError>(())
/// ```
#[derive(Clone)]
pub struct TodoStore {
    todos: Vec<Todo>,
    ids: Arc<dyn IdGenerator>,
}

impl TodoStore {
    /// Creates an empty store drawing ids from `ids`
    #[must_use]
    pub fn new(ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            todos: Vec::new(),
            ids,
        }
    }

    /// Appends a todo with trimmed `text` and a fresh id
    ///
    /// # Errors
    ///
    /// - [`TodoError::EmptyInput`] if `text` is blank; the list is unchanged
    /// - [`TodoError::IdCollision`] if the id generator keeps producing ids
    ///   already in use
    pub fn add(&mut self, text: &str) -> Result<Todo, TodoError> {
        let todo = self.prepare(text)?;
        self.todos.push(todo.clone());
        Ok(todo)
    }

    /// Builds the todo `add` would append, without appending it
    ///
    /// Consumes an id from the generator even though nothing is stored.
    ///
    /// # Errors
    ///
    /// Same as [`TodoStore::add`].
    pub fn prepare(&self, text: &str) -> Result<Todo, TodoError> {
        let content = text.trim();
        if content.is_empty() {
            return Err(TodoError::EmptyInput);
        }

        let id = self.unused_id()?;
        Ok(Todo::new(id, content))
    }

    /// Appends an already built todo
    ///
    /// Holds it to the same rules as [`TodoStore::add`], minus the trimming:
    /// the content must not be blank and the id must be non-empty and free.
    ///
    /// # Errors
    ///
    /// - [`TodoError::EmptyInput`] if the content is blank
    /// - [`TodoError::InvalidId`] if the id is empty or already in the list
    pub fn insert(&mut self, todo: Todo) -> Result<(), TodoError> {
        if todo.content.trim().is_empty() {
            return Err(TodoError::EmptyInput);
        }
        if todo.id.as_str().trim().is_empty() || self.contains(&todo.id) {
            return Err(TodoError::InvalidId(todo.id));
        }
        self.todos.push(todo);
        Ok(())
    }

    /// Removes the todo with `id`
    ///
    /// Absent ids are ignored, so a repeated delete is harmless.
    pub fn delete(&mut self, id: &TodoId) -> Option<Todo> {
        let index = self.position(id)?;
        Some(self.todos.remove(index))
    }

    /// Replaces the content of the todo with `id`
    ///
    /// `content` is stored as given: no trimming, blank text allowed.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no todo has `id`.
    pub fn edit(&mut self, id: &TodoId, content: impl Into<String>) -> Result<(), TodoError> {
        let todo = self
            .todos
            .iter_mut()
            .find(|todo| &todo.id == id)
            .ok_or_else(|| TodoError::NotFound(id.clone()))?;
        todo.content = content.into();
        Ok(())
    }

    /// Moves the todo at `from` so that it ends up at `to`
    ///
    /// Remove-then-insert: on `[A, B, C]`, `reorder(0, 2)` gives `[B, C, A]`
    /// and `reorder(2, 0)` gives `[C, A, B]`. Equal indices do nothing.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::IndexOutOfRange`] if either index is not below
    /// the current length.
    pub fn reorder(&mut self, from: usize, to: usize) -> Result<(), TodoError> {
        self.check_index(from)?;
        self.check_index(to)?;
        if from == to {
            return Ok(());
        }

        let todo = self.todos.remove(from);
        self.todos.insert(to, todo);
        Ok(())
    }

    /// Current order, read-only
    #[must_use]
    pub fn list(&self) -> &[Todo] {
        &self.todos
    }

    /// Number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.todos.len()
    }

    /// Returns true if the list has no todos
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    /// Returns the todo with `id`
    #[must_use]
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.todos.iter().find(|todo| &todo.id == id)
    }

    /// Returns the position of the todo with `id`
    #[must_use]
    pub fn position(&self, id: &TodoId) -> Option<usize> {
        self.todos.iter().position(|todo| &todo.id == id)
    }

    /// Checks if a todo with `id` exists
    #[must_use]
    pub fn contains(&self, id: &TodoId) -> bool {
        self.position(id).is_some()
    }

    /// Checks that `index` addresses an existing todo
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::IndexOutOfRange`] otherwise.
    pub fn check_index(&self, index: usize) -> Result<(), TodoError> {
        if index < self.todos.len() {
            Ok(())
        } else {
            Err(TodoError::IndexOutOfRange {
                index,
                len: self.todos.len(),
            })
        }
    }

    // A generator that keeps returning distinct ids must hit a free one
    // within len + 1 tries.
    fn unused_id(&self) -> Result<TodoId, TodoError> {
        for _ in 0..=self.todos.len() {
            let id = TodoId::new(self.ids.next_id());
            if !self.contains(&id) {
                return Ok(id);
            }
            tracing::warn!(%id, "Id generator returned an id already in use");
        }
        Err(TodoError::IdCollision)
    }
}

impl Default for TodoStore {
    fn default() -> Self {
        Self::new(Arc::new(SequentialIdGenerator::new(DEFAULT_ID_PREFIX)))
    }
}

impl std::fmt::Debug for TodoStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoStore")
            .field("todos", &self.todos)
            .finish_non_exhaustive()
    }
}
