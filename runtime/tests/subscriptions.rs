//! Integration tests for Store snapshot subscriptions
//!
//! A rendering layer holds a `watch` receiver and redraws whenever a new
//! snapshot is published. These tests drive that flow from another task.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use snapstore_core::{action::Action, reducer::Reducer, snapshot::Version};
use snapstore_runtime::{Store, StoreConfig};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone)]
enum TestAction {
    Append(&'static str),
    Clear,
}

impl Action for TestAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Append(_) => "append",
            Self::Clear => "clear",
        }
    }
}

#[derive(Debug)]
struct AlreadyEmpty;

impl fmt::Display for AlreadyEmpty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("already empty")
    }
}

impl std::error::Error for AlreadyEmpty {}

struct TestReducer;

impl Reducer for TestReducer {
    type State = Vec<&'static str>;
    type Action = TestAction;
    type Environment = ();
    type Error = AlreadyEmpty;

    fn reduce(
        &self,
        state: &Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Result<Self::State, Self::Error> {
        match action {
            TestAction::Append(word) => Ok(state.iter().copied().chain([word]).collect()),
            TestAction::Clear if state.is_empty() => Err(AlreadyEmpty),
            TestAction::Clear => Ok(Vec::new()),
        }
    }
}

fn new_store() -> Arc<Store<Vec<&'static str>, TestAction, (), TestReducer>> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    Arc::new(Store::with_config(
        Vec::new(),
        TestReducer,
        (),
        StoreConfig::default().with_name("words").with_metrics(false),
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_subscriber_wakes_on_accepted_action() {
    let store = new_store();
    let mut rx = store.subscribe();

    let renderer = tokio::spawn(async move {
        rx.changed().await.unwrap();
        let snapshot = rx.borrow_and_update().clone();
        (snapshot.version(), snapshot.state().clone())
    });

    store.send(TestAction::Append("hello")).unwrap();

    let (version, words) = tokio::time::timeout(Duration::from_secs(1), renderer)
        .await
        .expect("renderer should be woken")
        .unwrap();

    assert_eq!(version, Version::new(1));
    assert_eq!(words, vec!["hello"]);
}

#[tokio::test]
async fn test_rejection_does_not_wake_subscriber() {
    let store = new_store();
    let mut rx = store.subscribe();

    assert!(store.send(TestAction::Clear).is_err());

    let woke = tokio::time::timeout(Duration::from_millis(50), rx.changed()).await;
    assert!(woke.is_err(), "rejected action must not notify subscribers");
    assert_eq!(store.version(), Version::INITIAL);
}

#[tokio::test]
async fn test_slow_subscriber_sees_latest_snapshot() {
    let store = new_store();
    let mut rx = store.subscribe();

    store.send(TestAction::Append("a")).unwrap();
    store.send(TestAction::Append("b")).unwrap();
    store.send(TestAction::Append("c")).unwrap();

    rx.changed().await.unwrap();
    let latest = rx.borrow_and_update().clone();

    assert_eq!(latest.version(), Version::new(3));
    assert_eq!(latest.state(), &vec!["a", "b", "c"]);
    assert!(latest.ptr_eq(&store.snapshot()));
}

#[tokio::test]
async fn test_sends_from_many_tasks_are_serialised() {
    let store = new_store();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store.send(TestAction::Append("x")).unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.version(), Version::new(10));
    assert_eq!(store.state(Vec::len), 10);
}
