//! Property tests for route table atomicity and uniqueness

use prism_routing::{RouteTable, RouteUpdate, UpdateAction, UpdateEntry};
use prism_types::{Address, Selector};
use proptest::prelude::*;

fn arb_selector() -> impl Strategy<Value = Selector> {
    // Small id space so batches actually collide
    (0u8..8).prop_map(|n| Selector::new([n, 0, 0, 0]))
}

fn arb_target() -> impl Strategy<Value = Address> {
    (1u8..5).prop_map(|n| Address::new([n; 20]))
}

fn arb_action() -> impl Strategy<Value = UpdateAction> {
    prop_oneof![
        Just(UpdateAction::Add),
        Just(UpdateAction::Replace),
        Just(UpdateAction::Remove),
    ]
}

fn arb_entry() -> impl Strategy<Value = UpdateEntry> {
    (arb_target(), arb_action(), prop::collection::vec(arb_selector(), 0..4)).prop_map(
        |(target, action, selectors)| UpdateEntry {
            target,
            action,
            selectors,
        },
    )
}

fn arb_update() -> impl Strategy<Value = RouteUpdate> {
    prop::collection::vec(arb_entry(), 0..5).prop_map(|entries| RouteUpdate { entries })
}

proptest! {
    /// A batch either fully applies or leaves the table exactly as it was.
    #[test]
    fn prop_apply_is_all_or_nothing(updates in prop::collection::vec(arb_update(), 1..12)) {
        let mut table = RouteTable::new();
        for update in &updates {
            let before = table.clone();
            if table.apply(update).is_err() {
                prop_assert_eq!(&table, &before);
            }
        }
    }

    /// After any sequence of updates, every selector has at most one target,
    /// and the grouped view agrees with point lookups.
    #[test]
    fn prop_uniqueness_and_view_consistency(updates in prop::collection::vec(arb_update(), 1..12)) {
        let mut table = RouteTable::new();
        for update in &updates {
            let _ = table.apply(update);
        }

        let groups = table.routes();
        let mut seen = std::collections::HashSet::new();
        for group in &groups {
            for selector in &group.selectors {
                prop_assert!(seen.insert(*selector), "selector listed twice");
                prop_assert_eq!(table.target_of(*selector), Some(group.target));
            }
            prop_assert_eq!(&table.selectors_of(group.target), &group.selectors);
        }
        prop_assert_eq!(seen.len(), table.len());
    }

    /// A successful add of fresh selectors followed by the matching remove
    /// restores the exact pre-add table.
    #[test]
    fn prop_add_remove_roundtrip(
        updates in prop::collection::vec(arb_update(), 0..8),
        target in arb_target(),
    ) {
        let mut table = RouteTable::new();
        for update in &updates {
            let _ = table.apply(update);
        }

        // A selector outside the generated id space is always fresh
        let fresh = Selector::new([0xff, 0, 0, 0]);
        let before = table.clone();

        table.apply(&RouteUpdate::new().add(target, vec![fresh])).unwrap();
        prop_assert_eq!(table.target_of(fresh), Some(target));
        table.apply(&RouteUpdate::new().remove(target, vec![fresh])).unwrap();

        prop_assert_eq!(&table, &before);
    }
}
