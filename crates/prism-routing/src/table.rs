//! Selector route table
//!
//! Provides [`RouteTable`], the per-instance map from operation selector to
//! implementing target, mutated only through atomic [`RouteUpdate`] batches.

use indexmap::IndexMap;
use prism_types::{Address, Selector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::RoutingError;
use crate::update::{RouteUpdate, UpdateAction, UpdateEntry};

/// Read-side view of one target and the selectors bound to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteGroup {
    /// Implementing target
    pub target: Address,
    /// Selectors currently routed to the target, in binding order
    pub selectors: Vec<Selector>,
}

/// Map from operation selector to implementing target
///
/// Uniqueness is structural: a selector binds to at most one target; a
/// target may own any number of selectors. All mutation goes through
/// [`RouteTable::apply`], which stages the whole batch on a scratch copy and
/// commits it in one step, so observers see either the pre-update or the
/// fully-applied post-update table, never an intermediate one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: IndexMap<Selector, Address>,
}

impl RouteTable {
    /// Create an empty table
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Target currently bound to `selector`, if any
    #[inline]
    #[must_use]
    pub fn target_of(&self, selector: Selector) -> Option<Address> {
        self.routes.get(&selector).copied()
    }

    /// All selectors currently bound to `target`, in binding order
    #[must_use]
    pub fn selectors_of(&self, target: Address) -> Vec<Selector> {
        self.routes
            .iter()
            .filter(|(_, t)| **t == target)
            .map(|(s, _)| *s)
            .collect()
    }

    /// The whole table grouped by target
    ///
    /// Targets appear in order of their first binding; selectors within a
    /// group in binding order. Reflects the table exactly at call time.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteGroup> {
        let mut groups: IndexMap<Address, Vec<Selector>> = IndexMap::new();
        for (selector, target) in &self.routes {
            groups.entry(*target).or_default().push(*selector);
        }
        groups
            .into_iter()
            .map(|(target, selectors)| RouteGroup { target, selectors })
            .collect()
    }

    /// Number of routed selectors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Check if no selector is routed
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Apply a route update batch atomically
    ///
    /// Entries validate and apply in list order against a scratch copy;
    /// on success the scratch copy replaces the table in one step, on any
    /// precondition violation the table is left byte-for-byte unchanged.
    ///
    /// # Errors
    /// Returns the first [`RoutingError`] encountered during validation.
    pub fn apply(&mut self, update: &RouteUpdate) -> Result<(), RoutingError> {
        let mut scratch = self.routes.clone();
        for entry in &update.entries {
            Self::apply_entry(&mut scratch, entry)?;
        }
        debug!(
            entries = update.entries.len(),
            routed = scratch.len(),
            "route update committed"
        );
        self.routes = scratch;
        Ok(())
    }

    fn apply_entry(
        scratch: &mut IndexMap<Selector, Address>,
        entry: &UpdateEntry,
    ) -> Result<(), RoutingError> {
        match entry.action {
            UpdateAction::Add => {
                for &selector in &entry.selectors {
                    match scratch.get(&selector) {
                        Some(&existing) if existing != entry.target => {
                            return Err(RoutingError::AlreadyRouted {
                                selector,
                                target: existing,
                            });
                        }
                        // Re-adding to the current target is a no-op
                        Some(_) => {}
                        None => {
                            scratch.insert(selector, entry.target);
                        }
                    }
                }
            }
            UpdateAction::Replace => {
                for &selector in &entry.selectors {
                    if !scratch.contains_key(&selector) {
                        return Err(RoutingError::NotRouted(selector));
                    }
                    scratch.insert(selector, entry.target);
                }
            }
            UpdateAction::Remove => {
                for &selector in &entry.selectors {
                    match scratch.get(&selector) {
                        None => return Err(RoutingError::NotRouted(selector)),
                        Some(&actual) if actual != entry.target => {
                            return Err(RoutingError::TargetMismatch {
                                selector,
                                expected: entry.target,
                                actual,
                            });
                        }
                        Some(_) => {
                            scratch.shift_remove(&selector);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn addr(n: u8) -> Address {
        Address::new([n; 20])
    }

    fn sel(n: u8) -> Selector {
        Selector::new([n, 0, 0, 0])
    }

    #[test]
    fn add_binds_selectors() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1), sel(2)]))
            .unwrap();

        assert_eq!(table.target_of(sel(1)), Some(addr(1)));
        assert_eq!(table.target_of(sel(2)), Some(addr(1)));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn add_rejects_selector_routed_elsewhere() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1)]))
            .unwrap();

        let err = table
            .apply(&RouteUpdate::new().add(addr(2), vec![sel(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            RoutingError::AlreadyRouted {
                selector: sel(1),
                target: addr(1)
            }
        );
        assert_eq!(table.target_of(sel(1)), Some(addr(1)));
    }

    #[test]
    fn re_add_to_same_target_is_noop() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1)]))
            .unwrap();
        let before = table.clone();

        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1)]))
            .unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn replace_rebinds_routed_selector() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1)]))
            .unwrap();
        table
            .apply(&RouteUpdate::new().replace(addr(2), vec![sel(1)]))
            .unwrap();

        assert_eq!(table.target_of(sel(1)), Some(addr(2)));
    }

    #[test]
    fn replace_rejects_unrouted_selector() {
        let mut table = RouteTable::new();
        let err = table
            .apply(&RouteUpdate::new().replace(addr(2), vec![sel(9)]))
            .unwrap_err();
        assert_eq!(err, RoutingError::NotRouted(sel(9)));
    }

    #[test]
    fn remove_requires_matching_target() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1)]))
            .unwrap();

        let err = table
            .apply(&RouteUpdate::new().remove(addr(2), vec![sel(1)]))
            .unwrap_err();
        assert_eq!(
            err,
            RoutingError::TargetMismatch {
                selector: sel(1),
                expected: addr(2),
                actual: addr(1)
            }
        );

        table
            .apply(&RouteUpdate::new().remove(addr(1), vec![sel(1)]))
            .unwrap();
        assert_eq!(table.target_of(sel(1)), None);
    }

    #[test]
    fn remove_rejects_unrouted_selector() {
        let mut table = RouteTable::new();
        let err = table
            .apply(&RouteUpdate::new().remove(addr(1), vec![sel(1)]))
            .unwrap_err();
        assert_eq!(err, RoutingError::NotRouted(sel(1)));
    }

    #[test]
    fn add_then_remove_restores_exact_pre_add_table() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1), sel(2)]))
            .unwrap();
        let before = table.clone();

        table
            .apply(&RouteUpdate::new().add(addr(2), vec![sel(3)]))
            .unwrap();
        table
            .apply(&RouteUpdate::new().remove(addr(2), vec![sel(3)]))
            .unwrap();

        assert_eq!(table, before);
    }

    #[test]
    fn failing_second_entry_discards_whole_batch() {
        let mut table = RouteTable::new();
        table
            .apply(&RouteUpdate::new().add(addr(1), vec![sel(1)]))
            .unwrap();
        let before = table.clone();

        // First entry is valid, second replaces an unrouted selector
        let batch = RouteUpdate::new()
            .add(addr(2), vec![sel(2)])
            .replace(addr(2), vec![sel(9)]);
        let err = table.apply(&batch).unwrap_err();

        assert_eq!(err, RoutingError::NotRouted(sel(9)));
        assert_eq!(table, before);
        assert_eq!(table.target_of(sel(2)), None);
    }

    #[test]
    fn later_entries_see_earlier_entries_in_same_batch() {
        let mut table = RouteTable::new();
        // Add then remove the same binding within one batch
        let batch = RouteUpdate::new()
            .add(addr(1), vec![sel(1)])
            .remove(addr(1), vec![sel(1)]);
        table.apply(&batch).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn routes_groups_by_target_in_binding_order() {
        let mut table = RouteTable::new();
        table
            .apply(
                &RouteUpdate::new()
                    .add(addr(1), vec![sel(1)])
                    .add(addr(2), vec![sel(2)])
                    .add(addr(1), vec![sel(3)]),
            )
            .unwrap();

        let groups = table.routes();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].target, addr(1));
        assert_eq!(groups[0].selectors, vec![sel(1), sel(3)]);
        assert_eq!(groups[1].target, addr(2));
        assert_eq!(groups[1].selectors, vec![sel(2)]);
    }

    #[test]
    fn selectors_of_filters_by_target() {
        let mut table = RouteTable::new();
        table
            .apply(
                &RouteUpdate::new()
                    .add(addr(1), vec![sel(1), sel(2)])
                    .add(addr(2), vec![sel(3)]),
            )
            .unwrap();

        assert_eq!(table.selectors_of(addr(1)), vec![sel(1), sel(2)]);
        assert_eq!(table.selectors_of(addr(2)), vec![sel(3)]);
        assert!(table.selectors_of(addr(9)).is_empty());
    }
}
