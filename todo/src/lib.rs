//! Reorderable todo list built on Listkeeper.
//!
//! The list itself is [`TodoStore`]: an ordered, id-unique sequence with
//! add, delete, edit, reorder and list operations. Around it,
//! [`TodoReducer`] models the interaction state a front end keeps (the
//! new-todo input, the edit dialog, drag release) so a single-writer
//! [`Store`](listkeeper_runtime::Store) can drive everything from discrete
//! user events.
//!
//! # Quick Start
//!
//! ```
//! use listkeeper_runtime::Store;
//! use todo::{TodoAction, TodoAppState, TodoReducer};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = Store::new(TodoAppState::default(), TodoReducer::new(), ());
//!
//! store.send(TodoAction::AddTodo { text: "Buy milk".to_string() })?;
//! store.send(TodoAction::AddTodo { text: "Walk dog".to_string() })?;
//!
//! // Drag "Walk dog" to the top
//! store.send(TodoAction::DragEnded { source: 1, destination: Some(0) })?;
//!
//! let first = store.state(|s| s.todos.list()[0].content.clone());
//! assert_eq!(first, "Walk dog");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod config;
pub mod reducer;
pub mod repl;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::{ConfigError, IdStrategy, TodoConfig};
pub use reducer::TodoReducer;
pub use store::TodoStore;
pub use types::{EditSession, Todo, TodoAction, TodoAppState, TodoError, TodoId};

/// Store driving the todo app
pub type TodoApp = listkeeper_runtime::Store<TodoAppState, TodoAction, (), TodoReducer>;
