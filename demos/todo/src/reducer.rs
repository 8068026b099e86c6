//! Reducer logic for the todo list.
//!
//! The reducer is a pure function from the current [`TodoList`] snapshot and
//! a [`TodoAction`] to the next snapshot. Invalid input (blank text, unknown
//! ids) is rejected with a [`TodoError`] and the store keeps the current
//! snapshot.

use crate::types::{validate_text, TodoError, TodoId, TodoList};
use serde::{Deserialize, Serialize};
use snapstore_core::environment::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
use snapstore_core::reducer::Reducer;
use snapstore_macros::Action;
use std::sync::Arc;

/// Everything a user can do to the list
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TodoAction {
    /// Append a new item
    Add {
        /// Raw user input, trimmed by the reducer
        text: String,
    },

    /// Flip an item between active and completed
    Toggle {
        /// Item to toggle
        id: TodoId,
    },

    /// Delete an item for good
    Remove {
        /// Item to delete
        id: TodoId,
    },

    /// Rename an item
    Edit {
        /// Item to rename
        id: TodoId,
        /// Raw replacement text, trimmed by the reducer
        text: String,
    },
}

/// Environment dependencies for the todo reducer
#[derive(Clone)]
pub struct TodoEnvironment {
    /// Clock for creation timestamps
    pub clock: Arc<dyn Clock>,
    /// Source of fresh item ids
    pub ids: Arc<dyn IdGenerator>,
}

impl TodoEnvironment {
    /// Creates a new `TodoEnvironment`
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { clock, ids }
    }

    /// System clock and random ids
    #[must_use]
    pub fn system() -> Self {
        Self::new(Arc::new(SystemClock), Arc::new(RandomIdGenerator))
    }
}

impl std::fmt::Debug for TodoEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TodoEnvironment").finish_non_exhaustive()
    }
}

/// Reducer for the todo list
#[derive(Clone, Copy, Debug, Default)]
pub struct TodoReducer;

impl TodoReducer {
    /// Creates a new `TodoReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for TodoReducer {
    type State = TodoList;
    type Action = TodoAction;
    type Environment = TodoEnvironment;
    type Error = TodoError;

    fn reduce(
        &self,
        state: &Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Self::State, Self::Error> {
        match action {
            TodoAction::Add { text } => {
                // Blank input must not consume an id
                let text = validate_text(&text)?;
                let id = TodoId::from_uuid(env.ids.next_id());
                state.add(id, text, env.clock.now())
            },
            TodoAction::Toggle { id } => state.toggle(id),
            TodoAction::Remove { id } => state.remove(id),
            TodoAction::Edit { id, text } => state.edit(id, &text),
        }
    }
}
