//! Tests for #[derive(Action)] macro

use snapstore_core::action::Action as _;
use snapstore_macros::Action;

#[derive(Action, Clone, Debug, PartialEq)]
enum TodoAction {
    Add {
        text: String,
    },

    Toggle(u64),

    ClearCompleted,

    #[action(name = "rename")]
    Edit {
        id: u64,
        text: String,
    },
}

#[derive(Action, Debug)]
enum Wrapper<T> {
    Inner(T),
}

#[test]
fn test_named_variant() {
    let action = TodoAction::Add {
        text: "Buy milk".to_string(),
    };
    assert_eq!(action.name(), "add");
}

#[test]
fn test_tuple_variant() {
    assert_eq!(TodoAction::Toggle(1).name(), "toggle");
}

#[test]
fn test_unit_variant_is_snake_cased() {
    assert_eq!(TodoAction::ClearCompleted.name(), "clear_completed");
}

#[test]
fn test_name_override() {
    let action = TodoAction::Edit {
        id: 7,
        text: "New".to_string(),
    };
    assert_eq!(action.name(), "rename");
}

#[test]
fn test_generic_enum() {
    assert_eq!(Wrapper::Inner(42_u8).name(), "inner");
}
