//! Todo list built on snapshot stores.
//!
//! A todo list is an ordered collection of items that can be added,
//! toggled, removed and renamed. Every change produces a new immutable
//! [`TodoList`] snapshot; the store publishes it under the next version so a
//! renderer can tell whether anything changed.
//!
//! - [`types`]: `TodoItem`, `TodoList` and the pure list operations
//! - [`reducer`]: `TodoAction` and `TodoReducer`
//! - [`view`]: rows, placeholder, stats line and edit mode
//! - [`cli`]: the interactive line front end
//! - [`config`]: environment configuration
//!
//! # Quick Start
//!
//! ```
//! use snapstore_runtime::Store;
//! use todo::{TodoAction, TodoEnvironment, TodoList, TodoReducer};
//!
//! let store = Store::new(TodoList::new(), TodoReducer::new(), TodoEnvironment::system());
//!
//! let list = store.send(TodoAction::Add { text: "Buy milk".to_string() })?;
//! let id = list.items()[0].id;
//!
//! store.send(TodoAction::Toggle { id })?;
//!
//! let stats = store.state(TodoList::stats);
//! assert_eq!((stats.total, stats.completed, stats.remaining), (1, 1, 0));
//!
//! // Blank input is rejected and the snapshot stays as it was
//! let before = store.snapshot();
//! assert!(store.send(TodoAction::Add { text: "   ".to_string() }).is_err());
//! assert!(store.snapshot().ptr_eq(&before));
//! # Ok::<(), todo::TodoError>(())
//! ```

pub mod cli;
pub mod config;
pub mod reducer;
pub mod types;
pub mod view;

// Re-export commonly used types
pub use reducer::{TodoAction, TodoEnvironment, TodoReducer};
pub use types::{ItemState, Stats, TodoError, TodoId, TodoItem, TodoList};

/// The store holding a todo list
pub type TodoStore = snapstore_runtime::Store<TodoList, TodoAction, TodoEnvironment, TodoReducer>;
