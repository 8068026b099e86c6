//! Line-oriented front end for the todo store.
//!
//! [`Command`] parses one input line. [`Session`] owns the store, a snapshot
//! subscription and the optional per-item edit mode, and turns each line into
//! the text to print. The list is re-rendered only when a new snapshot was
//! published, or when the edit mode changed what a row shows.

use crate::config::Config;
use crate::reducer::{TodoAction, TodoReducer};
use crate::types::{Stats, TodoId, TodoList};
use crate::view::{self, EditSession};
use crate::TodoStore;
use serde::Serialize;
use snapstore_core::snapshot::Snapshot;
use snapstore_runtime::metrics::PrometheusMetrics;
use snapstore_runtime::Store;
use std::io::ErrorKind;
use std::str::FromStr;
use thiserror::Error;
use tokio::io::{AsyncBufRead, Lines};
use tokio::sync::watch;

/// Typed in edit mode to leave it without saving
pub const CANCEL_EDIT: &str = ":cancel";

/// Help text listing every command
pub const HELP: &str = "\
Commands:
  add <text>          add a todo
  toggle <n>          mark todo n done / not done
  rm <n>              delete todo n
  edit <n> [text]     rename todo n (without text: enter edit mode)
  stats               show counts
  json                print the list as JSON
  metrics             print Prometheus metrics
  help                show this help
  quit                exit";

/// One parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add <text>`; blank text is passed through and ignored by the store
    Add(String),
    /// `toggle <n>`
    Toggle(usize),
    /// `rm <n>`
    Remove(usize),
    /// `edit <n> [text]`
    Edit {
        /// 1-based position
        position: usize,
        /// Replacement text; `None` enters edit mode
        text: Option<String>,
    },
    /// `stats`
    Stats,
    /// `json`
    Json,
    /// `metrics`
    Metrics,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// Why a line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Blank line
    #[error("empty input")]
    Empty,

    /// First word is not a command
    #[error("unknown command `{0}`, type `help` for a list")]
    Unknown(String),

    /// Command needs a position
    #[error("`{0}` needs a position, e.g. `{0} 1`")]
    MissingPosition(&'static str),

    /// Position is not a positive number
    #[error("`{0}` is not a valid position")]
    InvalidPosition(String),
}

fn parse_position(command: &'static str, arg: Option<&str>) -> Result<usize, ParseError> {
    let raw = arg.ok_or(ParseError::MissingPosition(command))?;
    match raw.parse::<usize>() {
        Ok(position) if position > 0 => Ok(position),
        _ => Err(ParseError::InvalidPosition(raw.to_string())),
    }
}

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ParseError::Empty);
        }

        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));
        let mut args = rest.splitn(2, char::is_whitespace);
        let first = args.next().filter(|arg| !arg.is_empty());

        match word.to_ascii_lowercase().as_str() {
            "add" | "a" => Ok(Self::Add(rest.to_string())),
            "toggle" | "t" => parse_position("toggle", first).map(Self::Toggle),
            "rm" | "remove" | "delete" => parse_position("rm", first).map(Self::Remove),
            "edit" | "e" => {
                let position = parse_position("edit", first)?;
                let text = args.next().map(str::trim).filter(|text| !text.is_empty());
                Ok(Self::Edit {
                    position,
                    text: text.map(ToString::to_string),
                })
            },
            "stats" => Ok(Self::Stats),
            "json" => Ok(Self::Json),
            "metrics" => Ok(Self::Metrics),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}

/// What to do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Print the text (possibly empty) and read the next line
    Continue(String),
    /// Stop reading input
    Quit,
}

#[derive(Serialize)]
struct Export<'a> {
    version: u64,
    stats: Stats,
    items: &'a TodoList,
}

/// An interactive session over one store
pub struct Session {
    store: TodoStore,
    changes: watch::Receiver<Snapshot<TodoList>>,
    editing: Option<EditSession>,
    placeholder: String,
    metrics: Option<PrometheusMetrics>,
}

impl Session {
    /// Start a session with an empty list built from `config`
    #[must_use]
    pub fn new(config: &Config, metrics: Option<PrometheusMetrics>) -> Self {
        let store = Store::with_config(
            TodoList::new(),
            TodoReducer::new(),
            config.environment(),
            config.store_config(),
        );
        Self::with_store(store, config.placeholder.clone(), metrics)
    }

    /// Start a session over an existing store
    #[must_use]
    pub fn with_store(store: TodoStore, placeholder: String, metrics: Option<PrometheusMetrics>) -> Self {
        let changes = store.subscribe();
        Self {
            store,
            changes,
            editing: None,
            placeholder,
            metrics,
        }
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Item currently in edit mode, if any
    #[must_use]
    pub const fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Render the current snapshot unconditionally
    #[must_use]
    pub fn render(&self) -> String {
        let snapshot = self.store.snapshot();
        view::render(snapshot.state(), self.editing.as_ref(), &self.placeholder)
    }

    /// Prompt to show before reading a line
    #[must_use]
    pub fn prompt(&self) -> String {
        self.editing.as_ref().map_or_else(
            || "> ".to_string(),
            |session| format!("edit [{}] ({CANCEL_EDIT} to revert)> ", session.original()),
        )
    }

    /// Handle one input line
    pub fn handle_line(&mut self, line: &str) -> Step {
        if let Some(session) = self.editing.take() {
            return Step::Continue(self.finish_edit(session, line));
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(ParseError::Empty) => return Step::Continue(String::new()),
            Err(error) => return Step::Continue(error.to_string()),
        };

        match command {
            Command::Add(text) => Step::Continue(self.dispatch(TodoAction::Add { text })),
            Command::Toggle(position) => Step::Continue(
                self.with_item(position, |id| TodoAction::Toggle { id }),
            ),
            Command::Remove(position) => Step::Continue(
                self.with_item(position, |id| TodoAction::Remove { id }),
            ),
            Command::Edit {
                position,
                text: Some(text),
            } => Step::Continue(self.with_item(position, |id| TodoAction::Edit { id, text })),
            Command::Edit {
                position,
                text: None,
            } => Step::Continue(self.begin_edit(position)),
            Command::Stats => Step::Continue(self.store.state(TodoList::stats).to_string()),
            Command::Json => Step::Continue(self.export()),
            Command::Metrics => Step::Continue(self.render_metrics()),
            Command::Help => Step::Continue(HELP.to_string()),
            Command::Quit => Step::Quit,
        }
    }

    fn resolve(&self, position: usize) -> Option<TodoId> {
        self.store
            .state(|list| list.nth(position - 1).map(|item| item.id))
    }

    fn with_item<F>(&mut self, position: usize, action: F) -> String
    where
        F: FnOnce(TodoId) -> TodoAction,
    {
        match self.resolve(position) {
            Some(id) => self.dispatch(action(id)),
            None => format!("There is no todo number {position}"),
        }
    }

    fn dispatch(&mut self, action: TodoAction) -> String {
        if let Err(error) = self.store.send(action) {
            // Invalid input is dropped without bothering the user
            tracing::debug!(%error, "Input ignored");
        }
        self.refresh()
    }

    /// Re-render when a new snapshot was published since the last render
    fn refresh(&mut self) -> String {
        match self.changes.has_changed() {
            Ok(true) => {
                let snapshot = self.changes.borrow_and_update().clone();
                view::render(snapshot.state(), self.editing.as_ref(), &self.placeholder)
            },
            _ => String::new(),
        }
    }

    fn begin_edit(&mut self, position: usize) -> String {
        let session = self
            .store
            .state(|list| list.nth(position - 1).map(EditSession::begin));

        match session {
            Some(session) => {
                self.editing = Some(session);
                self.render()
            },
            None => format!("There is no todo number {position}"),
        }
    }

    fn finish_edit(&mut self, mut session: EditSession, line: &str) -> String {
        if line.trim() == CANCEL_EDIT {
            let original = session.cancel();
            tracing::debug!(%original, "Edit cancelled");
            return self.render();
        }

        session.set_draft(line);
        let rendered = self.dispatch(session.confirm());
        // Leaving edit mode changes the view even when the edit was rejected
        if rendered.is_empty() {
            self.render()
        } else {
            rendered
        }
    }

    fn export(&self) -> String {
        let snapshot = self.store.snapshot();
        let export = Export {
            version: snapshot.version().value(),
            stats: snapshot.stats(),
            items: snapshot.state(),
        };
        serde_json::to_string_pretty(&export)
            .unwrap_or_else(|error| format!("Could not serialize the list: {error}"))
    }

    fn render_metrics(&self) -> String {
        self.metrics
            .as_ref()
            .and_then(PrometheusMetrics::render)
            .unwrap_or_else(|| "Metrics are disabled (set TODO_METRICS=true)".to_string())
    }
}

/// Reads the next input line, skipping lines that are not valid UTF-8.
///
/// Returns `Ok(None)` at end of input.
///
/// # Errors
///
/// Returns any read error other than invalid UTF-8.
pub async fn next_line<R>(lines: &mut Lines<R>) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    loop {
        match lines.next_line().await {
            Err(error) if error.kind() == ErrorKind::InvalidData => {
                tracing::warn!(%error, "Skipping unreadable input line");
            },
            other => return other,
        }
    }
}
