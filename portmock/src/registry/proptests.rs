//! Property-based tests for the port registry.
//!
//! These check the ordering and mutation rules of the registry against a
//! plain `BTreeSet` model over randomly generated ranges and request
//! sequences.

use std::collections::BTreeSet;

use proptest::prelude::*;

use super::{Allocation, PortRegistry};
use crate::port::{Port, PortRange};

/// Strategy for small ranges: `(min, max)` with at most 64 ports.
fn range_strategy() -> impl Strategy<Value = (u16, u16)> {
    (2u16..60000, 0u16..64).prop_map(|(min, size)| (min, min + size))
}

/// A range together with a request sequence drawn from inside it.
fn scenario_strategy() -> impl Strategy<Value = ((u16, u16), Vec<u16>)> {
    range_strategy().prop_flat_map(|(min, max)| {
        (Just((min, max)), prop::collection::vec(min..=max, 0..128))
    })
}

fn build(min: u16, max: u16) -> PortRegistry {
    let range = PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap();
    // server port just below the range keeps it out of the allocation domain
    PortRegistry::new(range, Port::try_from(min - 1).unwrap())
}

proptest! {
    /// The registry agrees with a set model on every allocate-or-query call,
    /// and the fallback is always the smallest unreserved port.
    #[test]
    fn prop_allocate_matches_model(((min, max), requests) in scenario_strategy()) {
        let registry = build(min, max);
        let mut model: BTreeSet<u16> = BTreeSet::new();

        for raw in requests {
            let port = Port::try_from(raw).unwrap();
            let result = registry.allocate_or_query(port);

            if model.insert(raw) {
                prop_assert_eq!(result, Allocation::Acquired(port));
            } else {
                let expected = (min..=max).find(|p| !model.contains(p));
                prop_assert!(!result.acquired());
                prop_assert_eq!(result.result_port().map(Port::value), expected);
            }
        }

        prop_assert_eq!(registry.reserved_count(), model.len() + 1);
    }

    /// Find-first-free returns the smallest unreserved port, or `None`
    /// exactly when the whole range is reserved.
    #[test]
    fn prop_find_first_free_is_minimum((min, max) in range_strategy(), fill in 0usize..70) {
        let registry = build(min, max);
        let filled: Vec<u16> = (min..=max).take(fill).collect();
        for raw in &filled {
            registry.allocate_or_query(Port::try_from(*raw).unwrap());
        }

        let expected = (min..=max).find(|p| !filled.contains(p));
        prop_assert_eq!(registry.find_first_free().map(Port::value), expected);
        prop_assert_eq!(expected.is_none(), filled.len() == usize::from(max - min) + 1);
    }

    /// Reset always leaves exactly the server's own port.
    #[test]
    fn prop_reset_leaves_server_port(((min, max), requests) in scenario_strategy()) {
        let registry = build(min, max);
        for raw in requests {
            registry.allocate_or_query(Port::try_from(raw).unwrap());
        }

        registry.reset();
        let listed = registry.list_reserved();
        prop_assert_eq!(listed.ports(), &[registry.server_port()][..]);
    }
}
