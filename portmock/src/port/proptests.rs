//! Property-based tests for `Port` and `PortRange` types.

use super::{Port, PortRange};
use proptest::prelude::*;

const MIN_VALID_PORT: u16 = Port::MIN;
const MAX_VALID_PORT: u16 = Port::MAX;

fn range_strategy() -> impl Strategy<Value = (u16, u16)> {
    (MIN_VALID_PORT..=MAX_VALID_PORT).prop_flat_map(|min| (Just(min), min..=MAX_VALID_PORT))
}

proptest! {
    // Valid port ranges (1-65535)
    #[test]
    fn port_always_in_valid_range(port in MIN_VALID_PORT..=MAX_VALID_PORT) {
        let p = Port::try_from(port);
        prop_assert!(p.is_ok());
        prop_assert_eq!(p.unwrap().value(), port);
    }

    // Serialization rejects zero and preserves everything else
    #[test]
    fn port_serialization_roundtrip(port in MIN_VALID_PORT..=MAX_VALID_PORT) {
        let p = Port::try_from(port).unwrap();
        let json = serde_json::to_string(&p).unwrap();
        prop_assert_eq!(json.clone(), port.to_string());
        let back: Port = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(back, p);
    }

    // len() agrees with the iterator, which is ascending and stays in range
    #[test]
    fn range_iter_matches_len((min, max) in range_strategy()) {
        let range = PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap();

        let mut count = 0u32;
        let mut previous: Option<Port> = None;
        for port in range.iter().take(2048) {
            prop_assert!(range.contains(port));
            if let Some(prev) = previous {
                prop_assert_eq!(prev.value() + 1, port.value());
            }
            previous = Some(port);
            count += 1;
        }

        prop_assert_eq!(count, range.len().min(2048));
        prop_assert_eq!(range.iter().len(), range.len() as usize);
    }

    // contains_value agrees with contains for every representable port
    #[test]
    fn range_contains_value_consistent((min, max) in range_strategy(), probe in MIN_VALID_PORT..=MAX_VALID_PORT) {
        let range = PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap();
        let port = Port::try_from(probe).unwrap();

        prop_assert_eq!(range.contains(port), range.contains_value(i64::from(probe)));
        prop_assert_eq!(range.contains(port), min <= probe && probe <= max);
    }

    // Values outside u16 are never contained
    #[test]
    fn range_excludes_out_of_u16((min, max) in range_strategy(), value in prop_oneof![i64::MIN..=0i64, 65536i64..=i64::MAX]) {
        let range = PortRange::new(Port::try_from(min).unwrap(), Port::try_from(max).unwrap()).unwrap();
        prop_assert!(!range.contains_value(value));
    }

    // Inverted bounds are rejected
    #[test]
    fn range_rejects_inverted(a in MIN_VALID_PORT..MAX_VALID_PORT, gap in 1u16..=100) {
        let b = a.saturating_add(gap);
        prop_assume!(b > a);
        let result = PortRange::new(Port::try_from(b).unwrap(), Port::try_from(a).unwrap());
        prop_assert!(result.is_err());
    }
}
