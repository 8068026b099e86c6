//! Property tests for the todo reducer
//!
//! Arbitrary command sequences (including blank text and stale ids) must
//! keep the list well formed.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)] // Test code can use unwrap/expect/panic

use proptest::prelude::*;
use snapstore_core::environment::SequentialIdGenerator;
use snapstore_core::Uuid;
use snapstore_runtime::{Store, StoreConfig};
use snapstore_testing::test_clock;
use std::collections::HashSet;
use std::sync::Arc;
use todo::{TodoAction, TodoEnvironment, TodoId, TodoList, TodoReducer, TodoStore};

fn store() -> TodoStore {
    let env = TodoEnvironment::new(Arc::new(test_clock()), Arc::new(SequentialIdGenerator::new()));
    Store::with_config(
        TodoList::new(),
        TodoReducer::new(),
        env,
        StoreConfig::new("properties", false),
    )
}

fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[ a-z]{0,12}",
    ]
}

// Ids 1..=16 overlap with what the sequential generator hands out, so some
// toggles and removals hit real items and some do not
fn id() -> impl Strategy<Value = TodoId> {
    (1u128..=16).prop_map(|n| TodoId::from_uuid(Uuid::from_u128(n)))
}

fn action() -> impl Strategy<Value = TodoAction> {
    prop_oneof![
        3 => text().prop_map(|text| TodoAction::Add { text }),
        2 => id().prop_map(|id| TodoAction::Toggle { id }),
        1 => id().prop_map(|id| TodoAction::Remove { id }),
        1 => (id(), text()).prop_map(|(id, text)| TodoAction::Edit { id, text }),
    ]
}

proptest! {
    #[test]
    fn list_stays_well_formed(actions in prop::collection::vec(action(), 0..64)) {
        let store = store();

        for action in actions {
            let before = store.snapshot();
            match store.send(action) {
                Ok(after) => prop_assert_eq!(after.version(), before.version().next()),
                Err(_) => prop_assert!(store.snapshot().ptr_eq(&before)),
            }

            let list = store.snapshot();
            let stats = list.stats();
            prop_assert_eq!(stats.total, list.len());
            prop_assert_eq!(stats.completed + stats.remaining, stats.total);
            prop_assert_eq!(stats.completed, list.iter().filter(|item| item.completed).count());

            let ids: HashSet<TodoId> = list.iter().map(|item| item.id).collect();
            prop_assert_eq!(ids.len(), list.len());

            for item in list.iter() {
                prop_assert!(!item.text.trim().is_empty());
                prop_assert_eq!(item.text.trim(), item.text.as_str());
            }
        }
    }

    #[test]
    fn rejected_actions_publish_nothing(actions in prop::collection::vec(action(), 0..32)) {
        let store = store();
        let mut accepted = 0u64;

        for action in actions {
            if store.send(action).is_ok() {
                accepted += 1;
            }
        }

        prop_assert_eq!(store.version().value(), accepted);
    }
}
