//! # Snapstore Testing
//!
//! Testing utilities and helpers for snapshot stores.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - A Given-When-Then harness for reducers
//! - Assertion helpers for published snapshots
//!
//! ## Example
//!
//! ```ignore
//! use snapstore_testing::{test_clock, ReducerTest};
//!
//! #[test]
//! fn adds_an_item() {
//!     ReducerTest::new(TodoReducer::new())
//!         .with_env(TodoEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new())))
//!         .given_state(TodoList::new())
//!         .when_action(TodoAction::Add { text: "Buy milk".into() })
//!         .then_state(|next, _| assert_eq!(next.len(), 1))
//!         .run();
//! }
//! ```

use chrono::{DateTime, Utc};
use snapstore_core::environment::{Clock, IdGenerator};
use snapstore_core::Uuid;


/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Utc, Uuid};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use snapstore_testing::mocks::FixedClock;
    /// use snapstore_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Id generator that always returns the same id.
    ///
    /// Models a coarse id source (e.g. one tick of a millisecond clock) so
    /// tests can exercise collision handling.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedIdGenerator {
        id: Uuid,
    }

    impl FixedIdGenerator {
        /// Always hand out `id`
        #[must_use]
        pub const fn new(id: Uuid) -> Self {
            Self { id }
        }
    }

    impl IdGenerator for FixedIdGenerator {
        fn next_id(&self) -> Uuid {
            self.id
        }
    }
}

/// Helper assertions for published snapshots
pub mod assertions {
    use snapstore_core::snapshot::Snapshot;

    /// Assert that `after` is the very same snapshot as `before`
    ///
    /// # Panics
    ///
    /// Panics if the versions differ or the state was reallocated.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_unchanged<S>(before: &Snapshot<S>, after: &Snapshot<S>) {
        assert!(
            after.ptr_eq(before),
            "Expected snapshot {} to be unchanged, found {}",
            before.version(),
            after.version()
        );
    }

    /// Assert that `after` directly follows `before`
    ///
    /// # Panics
    ///
    /// Panics if `after` is not exactly one version newer than `before`.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_succeeds<S>(before: &Snapshot<S>, after: &Snapshot<S>) {
        assert_eq!(
            after.version(),
            before.version().next(),
            "Expected snapshot {} to follow {}",
            after.version(),
            before.version()
        );
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, FixedIdGenerator};
pub use reducer_test::ReducerTest;
