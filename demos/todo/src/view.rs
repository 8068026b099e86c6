//! Text rendering of a todo list snapshot.
//!
//! This is the binding between the store and whatever shows the list: one
//! row per item, a placeholder for an empty list, a stats line, and a
//! per-item editing mode that either confirms into a [`TodoAction::Edit`] or
//! reverts.

use crate::reducer::TodoAction;
use crate::types::{TodoId, TodoItem, TodoList};
use std::fmt;

/// Shown when the list has no items
pub const DEFAULT_PLACEHOLDER: &str = "Nothing to do yet. Add a todo to get started.";

/// One rendered line of the list
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row<'a> {
    /// 1-based display position
    pub position: usize,
    /// Item the row belongs to
    pub id: TodoId,
    /// Item text, or the draft while editing
    pub text: &'a str,
    /// Checkbox state
    pub completed: bool,
    /// Whether this row is in editing mode
    pub editing: bool,
}

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.completed { 'x' } else { ' ' };
        if self.editing {
            write!(f, "{:>3}. [{mark}] (editing) {}", self.position, self.text)
        } else {
            write!(f, "{:>3}. [{mark}] {}", self.position, self.text)
        }
    }
}

/// Build one row per item, in display order
#[must_use]
pub fn rows<'a>(list: &'a TodoList, editing: Option<&'a EditSession>) -> Vec<Row<'a>> {
    list.iter()
        .enumerate()
        .map(|(index, item)| {
            let session = editing.filter(|session| session.id() == item.id);
            Row {
                position: index + 1,
                id: item.id,
                text: session.map_or(item.text.as_str(), EditSession::draft),
                completed: item.completed,
                editing: session.is_some(),
            }
        })
        .collect()
}

/// Render the whole list: rows (or the placeholder) followed by the stats line
#[must_use]
pub fn render(list: &TodoList, editing: Option<&EditSession>, placeholder: &str) -> String {
    let mut out = String::new();

    if list.is_empty() {
        out.push_str(placeholder);
        out.push('\n');
    } else {
        for row in rows(list, editing) {
            out.push_str(&row.to_string());
            out.push('\n');
        }
    }

    out.push_str(&list.stats().to_string());
    out
}

/// Editing mode for a single item
///
/// Holds the original text so a cancelled edit reverts without touching the
/// store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditSession {
    id: TodoId,
    original: String,
    draft: String,
}

impl EditSession {
    /// Enter editing mode; the draft starts as the current text
    #[must_use]
    pub fn begin(item: &TodoItem) -> Self {
        Self {
            id: item.id,
            original: item.text.clone(),
            draft: item.text.clone(),
        }
    }

    /// Item being edited
    #[must_use]
    pub const fn id(&self) -> TodoId {
        self.id
    }

    /// Text before editing started
    #[must_use]
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Current draft
    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Replace the draft
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Leave editing mode, producing the action to send
    #[must_use]
    pub fn confirm(self) -> TodoAction {
        TodoAction::Edit {
            id: self.id,
            text: self.draft,
        }
    }

    /// Leave editing mode without sending anything; returns the original text
    #[must_use]
    pub fn cancel(self) -> String {
        self.original
    }
}
