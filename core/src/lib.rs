//! # Snapstore Core
//!
//! Core traits and types for building snapshot stores.
//!
//! A snapstore keeps its state as a sequence of immutable snapshots. Business
//! logic lives in a [`Reducer`](reducer::Reducer): a pure function
//! `(State, Action, Environment) → Result<State, Error>` that never mutates
//! the state it is given. The runtime publishes each accepted result as a new
//! [`Snapshot`](snapshot::Snapshot).
//!
//! ## Core Concepts
//!
//! - **State**: Domain state, cheap to clone and never mutated in place
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: Pure function producing the next state or a rejection
//! - **Snapshot**: Versioned, shared, immutable state value
//! - **Environment**: Injected dependencies (clock, id generation)
//!
//! ## Example
//!
//! ```
//! use snapstore_core::action::Action;
//! use snapstore_core::reducer::Reducer;
//!
//! #[derive(Debug)]
//! struct Underflow;
//!
//! impl std::fmt::Display for Underflow {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         f.write_str("counter cannot go below zero")
//!     }
//! }
//!
//! impl std::error::Error for Underflow {}
//!
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Action for CounterAction {
//!     fn name(&self) -> &'static str {
//!         match self {
//!             Self::Increment => "increment",
//!             Self::Decrement => "decrement",
//!         }
//!     }
//! }
//!
//! struct CounterReducer;
//!
//! impl Reducer for CounterReducer {
//!     type State = u32;
//!     type Action = CounterAction;
//!     type Environment = ();
//!     type Error = Underflow;
//!
//!     fn reduce(&self, state: &u32, action: CounterAction, _env: &()) -> Result<u32, Underflow> {
//!         match action {
//!             CounterAction::Increment => Ok(state + 1),
//!             CounterAction::Decrement => state.checked_sub(1).ok_or(Underflow),
//!         }
//!     }
//! }
//!
//! assert_eq!(CounterReducer.reduce(&0, CounterAction::Increment, &()).ok(), Some(1));
//! assert!(CounterReducer.reduce(&0, CounterAction::Decrement, &()).is_err());
//! ```

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;

/// Versioned immutable snapshots
pub mod snapshot;

/// Action module - inputs accepted by a reducer
pub mod action {
    /// Common behaviour of reducer inputs.
    ///
    /// Usually derived with `#[derive(Action)]` from `snapstore-macros`,
    /// which names each variant after its identifier in `snake_case`.
    pub trait Action {
        /// Stable, human readable name used for logging and metric labels.
        fn name(&self) -> &'static str;
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers are pure functions: `(State, Action, Environment) → Result<State, Error>`
///
/// They contain all business logic and are deterministic and testable.
pub mod reducer {
    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Error`: Why an action was rejected
    ///
    /// A rejection is not a failure of the store: it means the action was a
    /// no-op and the previous state remains current.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// Reason an action was rejected
        type Error: std::error::Error;

        /// Reduce an action into the next state.
        ///
        /// `state` is borrowed immutably; implementations build and return a
        /// new value instead of editing the current one.
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is invalid for `state`. The
        /// caller keeps `state` unchanged in that case.
        fn reduce(
            &self,
            state: &Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Self::State, Self::Error>;
    }
}

/// Environment module - Dependency injection traits
///
/// All nondeterminism a reducer needs (time, fresh identifiers) is abstracted
/// behind traits and injected via the Environment parameter.
pub mod environment {
    use chrono::{DateTime, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use uuid::Uuid;

    /// Clock trait - abstracts time operations for testability
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock reading the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }

    /// Source of fresh identifiers.
    ///
    /// Implementations must not derive ids from a wall clock: two calls in
    /// quick succession have to return distinct values.
    pub trait IdGenerator: Send + Sync {
        /// Produce the next identifier.
        fn next_id(&self) -> Uuid;
    }

    /// Random (v4) UUIDs.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct RandomIdGenerator;

    impl IdGenerator for RandomIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::new_v4()
        }
    }

    /// Monotonic counter rendered as a UUID (`00000000-0000-0000-0000-000000000001`, ...).
    ///
    /// Predictable output makes it handy for demos and deterministic tests.
    #[derive(Debug, Default)]
    pub struct SequentialIdGenerator {
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Start counting at 1.
        #[must_use]
        pub const fn new() -> Self {
            Self::starting_at(1)
        }

        /// Start counting at `first`.
        #[must_use]
        pub const fn starting_at(first: u64) -> Self {
            Self {
                next: AtomicU64::new(first),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> Uuid {
            Uuid::from_u128(u128::from(self.next.fetch_add(1, Ordering::Relaxed)))
        }
    }
}
