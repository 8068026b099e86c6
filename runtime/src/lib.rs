//! # Snapstore Runtime
//!
//! Runtime implementation for snapshot stores.
//!
//! This crate provides the [`Store`]: the single owner of a reducer's state.
//! The store runs the reducer for every action it is sent, publishes each
//! accepted result as a new immutable [`Snapshot`], and lets any number of
//! observers subscribe to snapshot changes.
//!
//! ## Core Components
//!
//! - **Store**: Owns the current snapshot and serialises reducer runs
//! - **Subscriptions**: `tokio::sync::watch` receivers notified on every accepted action
//! - **Metrics**: Counters and histograms for processed and rejected actions
//!
//! ## Example
//!
//! ```ignore
//! use snapstore_runtime::Store;
//!
//! let store = Store::new(initial_state, my_reducer, environment);
//! let mut changes = store.subscribe();
//!
//! // Send an action
//! let snapshot = store.send(Action::DoSomething)?;
//!
//! // Observers see the new snapshot
//! assert!(changes.has_changed()?);
//! ```

use snapstore_core::{action::Action, reducer::Reducer, snapshot::Snapshot, snapshot::Version};
use std::time::Instant;
use tokio::sync::watch;

/// Prometheus metrics for observability
pub mod metrics;

/// Configuration for the [`Store`]
///
/// # Example
///
/// ```
/// use snapstore_runtime::StoreConfig;
///
/// let config = StoreConfig::default()
///     .with_name("todo")
///     .with_metrics(false);
///
/// assert_eq!(config.name, "todo");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Name attached to log spans and metric labels
    pub name: String,
    /// Whether the store records metrics for each action
    pub record_metrics: bool,
}

impl StoreConfig {
    /// Create a new configuration with custom values
    #[must_use]
    pub fn new(name: impl Into<String>, record_metrics: bool) -> Self {
        Self {
            name: name.into(),
            record_metrics,
        }
    }

    /// Set the store name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enable or disable metrics recording
    #[must_use]
    pub const fn with_metrics(mut self, enabled: bool) -> Self {
        self.record_metrics = enabled;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            name: "store".to_string(),
            record_metrics: true,
        }
    }
}

/// Store module - The runtime for reducers
pub mod store {
    use super::{watch, Action, Instant, Reducer, Snapshot, StoreConfig, Version};
    use crate::metrics::StoreMetrics;

    /// The Store - single owner of a reducer's state
    ///
    /// The Store manages:
    /// 1. The current snapshot (behind a `watch` channel)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    ///
    /// `send` is synchronous. Reducer runs are serialised by the snapshot
    /// channel, so each action observes the result of the previous one.
    ///
    /// # Type Parameters
    ///
    /// - `S`: State type
    /// - `A`: Action type
    /// - `E`: Environment type
    /// - `R`: Reducer implementation
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(TodoList::new(), TodoReducer::new(), env);
    ///
    /// store.send(TodoAction::Add { text: "Buy milk".into() })?;
    /// assert_eq!(store.state(|list| list.len()), 1);
    /// ```
    pub struct Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
    {
        snapshots: watch::Sender<Snapshot<S>>,
        reducer: R,
        environment: E,
        config: StoreConfig,
    }

    impl<S, A, E, R> Store<S, A, E, R>
    where
        R: Reducer<State = S, Action = A, Environment = E>,
        A: Action,
    {
        /// Create a new store with initial state, reducer, and environment
        ///
        /// The initial state is published at [`Version::INITIAL`].
        #[must_use]
        pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
            Self::with_config(initial_state, reducer, environment, StoreConfig::default())
        }

        /// Create a new store with a custom configuration
        #[must_use]
        pub fn with_config(initial_state: S, reducer: R, environment: E, config: StoreConfig) -> Self {
            let (snapshots, _) = watch::channel(Snapshot::initial(initial_state));

            Self {
                snapshots,
                reducer,
                environment,
                config,
            }
        }

        /// Send an action to the store
        ///
        /// Runs the reducer against the current snapshot. When the reducer
        /// accepts the action, its result is published as the next snapshot
        /// and every subscriber is notified. When it rejects the action, the
        /// current snapshot stays published as-is (same version, same
        /// allocation) and subscribers are not woken.
        ///
        /// # Returns
        ///
        /// The snapshot published for this action.
        ///
        /// # Errors
        ///
        /// Returns the reducer's rejection. The store itself cannot fail.
        pub fn send(&self, action: A) -> Result<Snapshot<S>, R::Error> {
            let action_name = action.name();
            let span = tracing::debug_span!(
                "store_send",
                store = %self.config.name,
                action = action_name,
            );
            let _entered = span.enter();

            let started = Instant::now();
            let mut published = None;
            let mut rejection = None;

            self.snapshots.send_if_modified(|current| {
                match self.reducer.reduce(current.state(), action, &self.environment) {
                    Ok(next) => {
                        *current = current.succeed(next);
                        published = Some(current.clone());
                        true
                    },
                    Err(error) => {
                        rejection = Some(error);
                        false
                    },
                }
            });

            if self.config.record_metrics {
                StoreMetrics::record_action(&self.config.name, action_name, started.elapsed());
            }

            if let Some(error) = rejection {
                tracing::debug!(%error, "Action rejected, snapshot unchanged");
                if self.config.record_metrics {
                    StoreMetrics::record_rejection(&self.config.name, action_name);
                }
                return Err(error);
            }

            let snapshot = published.unwrap_or_else(|| self.snapshot());
            tracing::trace!(version = %snapshot.version(), "Snapshot published");
            if self.config.record_metrics {
                StoreMetrics::record_version(&self.config.name, snapshot.version());
            }

            Ok(snapshot)
        }

        /// The currently published snapshot
        #[must_use]
        pub fn snapshot(&self) -> Snapshot<S> {
            self.snapshots.borrow().clone()
        }

        /// Version of the currently published snapshot
        #[must_use]
        pub fn version(&self) -> Version {
            self.snapshots.borrow().version()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let remaining = store.state(|list| list.stats().remaining);
        /// ```
        pub fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&S) -> T,
        {
            let snapshot = self.snapshots.borrow();
            f(snapshot.state())
        }

        /// Subscribe to snapshot changes
        ///
        /// The receiver starts with the current snapshot marked as seen; it
        /// reports a change only after the next accepted action.
        #[must_use]
        pub fn subscribe(&self) -> watch::Receiver<Snapshot<S>> {
            self.snapshots.subscribe()
        }

        /// Number of live subscribers
        #[must_use]
        pub fn subscriber_count(&self) -> usize {
            self.snapshots.receiver_count()
        }

        /// The store configuration
        #[must_use]
        pub const fn config(&self) -> &StoreConfig {
            &self.config
        }

        /// The injected environment
        #[must_use]
        pub const fn environment(&self) -> &E {
            &self.environment
        }
    }
}

pub use store::Store;

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, Clone, PartialEq)]
    struct TestState {
        values: Vec<u32>,
    }

    #[derive(Debug, Clone)]
    enum TestAction {
        Push(u32),
        Pop,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                Self::Push(_) => "push",
                Self::Pop => "pop",
            }
        }
    }

    #[derive(Debug)]
    struct Empty;

    impl fmt::Display for Empty {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("nothing to pop")
        }
    }

    impl std::error::Error for Empty {}

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = ();
        type Error = Empty;

        fn reduce(&self, state: &TestState, action: TestAction, _env: &()) -> Result<TestState, Empty> {
            match action {
                TestAction::Push(value) => {
                    let mut values = state.values.clone();
                    values.push(value);
                    Ok(TestState { values })
                },
                TestAction::Pop => {
                    let (_, rest) = state.values.split_last().ok_or(Empty)?;
                    Ok(TestState {
                        values: rest.to_vec(),
                    })
                },
            }
        }
    }

    fn test_store() -> Store<TestState, TestAction, (), TestReducer> {
        Store::with_config(
            TestState { values: vec![] },
            TestReducer,
            (),
            StoreConfig::default().with_name("test").with_metrics(false),
        )
    }

    #[test]
    fn test_store_creation() {
        let store = test_store();
        assert_eq!(store.version(), Version::INITIAL);
        assert!(store.state(|s| s.values.is_empty()));
        assert_eq!(store.config().name, "test");
    }

    #[test]
    fn test_send_publishes_next_version() {
        let store = test_store();
        let before = store.snapshot();

        let after = store.send(TestAction::Push(1)).unwrap();

        assert_eq!(after.version(), Version::new(1));
        assert_eq!(after.values, vec![1]);
        assert!(store.snapshot().ptr_eq(&after));
        // The previous snapshot is left untouched
        assert!(before.values.is_empty());
        assert_eq!(before.version(), Version::INITIAL);
    }

    #[test]
    fn test_rejected_action_keeps_snapshot() {
        let store = test_store();
        let before = store.snapshot();

        let result = store.send(TestAction::Pop);

        assert!(result.is_err());
        assert!(store.snapshot().ptr_eq(&before));
        assert_eq!(store.version(), Version::INITIAL);
    }

    #[test]
    fn test_subscribers_only_see_accepted_actions() {
        let store = test_store();
        let mut rx = store.subscribe();
        assert_eq!(store.subscriber_count(), 1);
        assert!(!rx.has_changed().unwrap());

        let _ = store.send(TestAction::Pop);
        assert!(!rx.has_changed().unwrap());

        store.send(TestAction::Push(7)).unwrap();
        assert!(rx.has_changed().unwrap());

        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.version(), Version::new(1));
        assert_eq!(seen.values, vec![7]);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn test_send_without_subscribers() {
        let store = test_store();
        assert_eq!(store.subscriber_count(), 0);

        store.send(TestAction::Push(1)).unwrap();
        store.send(TestAction::Push(2)).unwrap();
        store.send(TestAction::Pop).unwrap();

        assert_eq!(store.version(), Version::new(3));
        assert_eq!(store.state(|s| s.values.clone()), vec![1]);
    }

    #[test]
    fn test_store_config_builder() {
        let config = StoreConfig::new("todo", true).with_metrics(false).with_name("other");
        assert_eq!(config.name, "other");
        assert!(!config.record_metrics);

        let default = StoreConfig::default();
        assert_eq!(default.name, "store");
        assert!(default.record_metrics);
    }
}
