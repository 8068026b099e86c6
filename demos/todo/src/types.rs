//! Domain types for the todo list.
//!
//! A [`TodoList`] is an immutable snapshot: every operation returns a new
//! list and leaves the receiver untouched. Items that an operation does not
//! touch are shared between the old and the new list, so a renderer can tell
//! which rows changed with a pointer comparison.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a todo item
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(Uuid);

impl TodoId {
    /// Creates a `TodoId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Why a todo operation was a no-op
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TodoError {
    /// Text was empty after trimming whitespace
    #[error("Todo text cannot be empty")]
    EmptyText,

    /// No item with this id exists
    #[error("Todo with ID {0} not found")]
    NotFound(TodoId),

    /// An item with this id already exists
    #[error("Todo with ID {0} already exists")]
    DuplicateId(TodoId),
}

/// Trims `raw` and rejects it when nothing is left.
///
/// # Errors
///
/// Returns [`TodoError::EmptyText`] for empty or whitespace-only input.
pub fn validate_text(raw: &str) -> Result<&str, TodoError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(TodoError::EmptyText)
    } else {
        Ok(trimmed)
    }
}

/// The two states an item moves between
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemState {
    /// Not done yet
    Active,
    /// Done
    Completed,
}

/// A single todo item
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier
    pub id: TodoId,
    /// Trimmed, non-empty label
    pub text: String,
    /// Whether the todo is completed
    pub completed: bool,
    /// When the todo was created
    pub created_at: DateTime<Utc>,
}

impl TodoItem {
    /// Creates a new, active todo item
    #[must_use]
    pub const fn new(id: TodoId, text: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
        }
    }

    /// Current state of the item
    #[must_use]
    pub const fn state(&self) -> ItemState {
        if self.completed {
            ItemState::Completed
        } else {
            ItemState::Active
        }
    }

    fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    fn renamed(&self, text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..self.clone()
        }
    }
}

/// Counts derived from a list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of items
    pub total: usize,
    /// Number of completed items
    pub completed: usize,
    /// Number of items still to do
    pub remaining: usize,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} total, {} completed, {} remaining",
            self.total, self.completed, self.remaining
        )
    }
}

/// Immutable, ordered list of todo items
///
/// Insertion order is display order. Invariants, upheld by every operation
/// and checked on deserialization:
/// - ids are unique
/// - text is trimmed and never empty
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TodoItem>", into = "Vec<TodoItem>")]
pub struct TodoList {
    items: Arc<[Arc<TodoItem>]>,
}

impl TodoList {
    /// Creates a new empty list
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
        }
    }

    fn from_items(items: Vec<Arc<TodoItem>>) -> Self {
        Self {
            items: Arc::from(items),
        }
    }

    /// Returns the number of todos
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the list has no items
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in display order
    pub fn iter(&self) -> impl Iterator<Item = &TodoItem> {
        self.items.iter().map(|item| &**item)
    }

    /// Shared item handles, for identity comparisons between snapshots
    #[must_use]
    pub fn items(&self) -> &[Arc<TodoItem>] {
        &self.items
    }

    /// Returns a todo by ID
    #[must_use]
    pub fn get(&self, id: TodoId) -> Option<&TodoItem> {
        self.iter().find(|item| item.id == id)
    }

    /// Returns the todo at a zero-based display position
    #[must_use]
    pub fn nth(&self, index: usize) -> Option<&TodoItem> {
        self.items.get(index).map(|item| &**item)
    }

    /// Checks if a todo exists
    #[must_use]
    pub fn contains(&self, id: TodoId) -> bool {
        self.position(id).is_some()
    }

    fn position(&self, id: TodoId) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    fn require(&self, id: TodoId) -> Result<usize, TodoError> {
        self.position(id).ok_or(TodoError::NotFound(id))
    }

    /// True when both lists share the same allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Appends a new active item with the trimmed `text`.
    ///
    /// # Errors
    ///
    /// - [`TodoError::EmptyText`] if `text` is blank
    /// - [`TodoError::DuplicateId`] if `id` is already in the list
    pub fn add(&self, id: TodoId, text: &str, created_at: DateTime<Utc>) -> Result<Self, TodoError> {
        let text = validate_text(text)?;
        if self.contains(id) {
            return Err(TodoError::DuplicateId(id));
        }

        let item = Arc::new(TodoItem::new(id, text.to_string(), created_at));
        Ok(Self::from_items(
            self.items.iter().cloned().chain(std::iter::once(item)).collect(),
        ))
    }

    /// Flips the completion flag of the matching item.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no item has this id.
    pub fn toggle(&self, id: TodoId) -> Result<Self, TodoError> {
        let index = self.require(id)?;
        Ok(self.replace_at(index, self.items[index].toggled()))
    }

    /// Removes the matching item.
    ///
    /// # Errors
    ///
    /// Returns [`TodoError::NotFound`] if no item has this id.
    pub fn remove(&self, id: TodoId) -> Result<Self, TodoError> {
        let index = self.require(id)?;
        Ok(Self::from_items(
            self.items
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, item)| Arc::clone(item))
                .collect(),
        ))
    }

    /// Replaces the text of the matching item with the trimmed `text`.
    ///
    /// Id, completion flag and creation time are kept.
    ///
    /// # Errors
    ///
    /// - [`TodoError::EmptyText`] if `text` is blank; the old text is kept
    /// - [`TodoError::NotFound`] if no item has this id
    pub fn edit(&self, id: TodoId, text: &str) -> Result<Self, TodoError> {
        let text = validate_text(text)?;
        let index = self.require(id)?;
        Ok(self.replace_at(index, self.items[index].renamed(text)))
    }

    /// Counts derived from the current items
    #[must_use]
    pub fn stats(&self) -> Stats {
        let total = self.len();
        let completed = self.iter().filter(|item| item.completed).count();
        Stats {
            total,
            completed,
            remaining: total - completed,
        }
    }

    fn replace_at(&self, index: usize, item: TodoItem) -> Self {
        let mut items: Vec<_> = self.items.iter().cloned().collect();
        items[index] = Arc::new(item);
        Self::from_items(items)
    }
}

impl Default for TodoList {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TodoList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl TryFrom<Vec<TodoItem>> for TodoList {
    type Error = TodoError;

    fn try_from(items: Vec<TodoItem>) -> Result<Self, Self::Error> {
        let mut seen = HashSet::with_capacity(items.len());
        let mut checked = Vec::with_capacity(items.len());

        for mut item in items {
            if !seen.insert(item.id) {
                return Err(TodoError::DuplicateId(item.id));
            }
            item.text = validate_text(&item.text)?.to_string();
            checked.push(Arc::new(item));
        }

        Ok(Self::from_items(checked))
    }
}

impl From<TodoList> for Vec<TodoItem> {
    fn from(list: TodoList) -> Self {
        list.iter().cloned().collect()
    }
}
