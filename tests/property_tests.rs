//! Property-based tests for paths and dispatch.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated trees, paths and events.

use proptest::prelude::*;
use statetree::builder::{compound, leaf, NodeBuilder};
use statetree::core::{decode, encode, Signal, StatePath, Target};
use statetree::engine::{Machine, MachineError};
use std::sync::{Arc, Mutex};

type Log = Arc<Mutex<Vec<String>>>;

prop_compose! {
    fn state_name()(name in "[a-z][a-z0-9_]{0,7}") -> String {
        name
    }
}

prop_compose! {
    fn segments()(segments in prop::collection::vec(state_name(), 0..6)) -> Vec<String> {
        segments
    }
}

/// A chain of `depth` compound levels ending in leaf `s0`. The node entered
/// at level `n` (counting up from the leaf) logs `s{n}`; every compound level
/// also has a leaf child named `side`.
fn chain<E: 'static>(depth: usize, log: &Log) -> Machine<E> {
    fn level<E: 'static>(remaining: usize, log: &Log) -> NodeBuilder<E> {
        let entered = Arc::clone(log);
        let name = format!("s{remaining}");
        let node = if remaining == 0 {
            leaf()
        } else {
            compound(format!("s{}", remaining - 1))
                .state(format!("s{}", remaining - 1), level(remaining - 1, log))
                .state("side", leaf())
        };
        node.entry(move || {
            entered.lock().unwrap().push(name.clone());
            None
        })
    }

    Machine::from_builder(level(depth, log).id("root")).unwrap()
}

/// Flat machine with leaves `l0..ln`; `go` on every leaf targets `l0`.
fn flat(leaves: usize) -> Machine<&'static str> {
    let mut root = compound("l0").id("flat");
    for index in 0..leaves {
        root = root.state(format!("l{index}"), leaf().on_target("go", "l0"));
    }
    Machine::from_builder(root).unwrap()
}

proptest! {
    #[test]
    fn encode_then_decode_is_absolute(root in state_name(), segments in segments()) {
        let text = encode(&root, &segments);
        let decoded = decode(&text).unwrap();

        prop_assert_eq!(decoded, Target::Absolute(StatePath::from_segments(root, segments)));
    }

    #[test]
    fn bare_names_decode_as_relative(name in state_name()) {
        prop_assert_eq!(decode(&name).unwrap(), Target::relative(name.clone()));
    }

    #[test]
    fn names_with_delimiters_are_not_relative(a in state_name(), b in state_name()) {
        let ambiguous = format!("{a}.{b}");
        prop_assert!(decode(&ambiguous).is_err());
    }

    #[test]
    fn initial_path_is_always_a_leaf(depth in 0usize..8) {
        let log = Log::default();
        let machine = chain::<&'static str>(depth, &log);

        let initial = machine.initial_path().unwrap();

        prop_assert_eq!(initial.depth(), depth);
        prop_assert!(machine.peek(&initial).unwrap().is_leaf());
        // Every level is entered exactly once, root first.
        let entered = log.lock().unwrap().clone();
        let expected: Vec<String> = (0..=depth).rev().map(|level| format!("s{level}")).collect();
        prop_assert_eq!(entered, expected);
    }

    #[test]
    fn unhandled_events_leave_path_unchanged(
        depth in 1usize..6,
        event in "[A-Za-z]{1,12}",
    ) {
        let log = Log::default();
        let machine = chain::<Signal>(depth, &log);
        let initial = machine.initial_path().unwrap();
        log.lock().unwrap().clear();

        let after = machine.emit(&initial, &Signal::new(event)).unwrap();

        prop_assert_eq!(after, initial);
        prop_assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn any_leaf_returns_to_first(leaves in 1usize..10, pick in any::<prop::sample::Index>()) {
        let machine = flat(leaves);
        let active = StatePath::from_segments("flat", [format!("l{}", pick.index(leaves))]);

        let after = machine.emit(&active, &"go").unwrap();

        prop_assert_eq!(after, StatePath::from_segments("flat", ["l0"]));
    }

    #[test]
    fn unknown_segments_are_named(depth in 1usize..6, stranger in "z[a-z]{1,6}") {
        let log = Log::default();
        let machine = chain::<&'static str>(depth, &log);
        let initial = machine.initial_path().unwrap();
        let missing = initial.parent().unwrap().child(stranger.as_str());

        let error = machine.emit(&missing, &"anything").unwrap_err();

        let unknown = error.unknown_state().unwrap();
        prop_assert_eq!(&unknown.segment, &stranger);
        prop_assert_eq!(unknown.parent.clone(), initial.parent());
        prop_assert!(matches!(error, MachineError::UnknownState(_)));
    }
}
