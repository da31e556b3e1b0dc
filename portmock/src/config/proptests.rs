//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::Config;
use super::validator::ConfigValidator;
use proptest::prelude::*;

// Strategy for generating valid port ranges
fn port_range_strategy() -> impl Strategy<Value = (u16, u16)> {
    (1u16..=65535).prop_flat_map(|start| (Just(start), start..=65535))
}

// Strategy for generating timeout bounds with a timeout inside them
fn timeout_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
    (1u64..=3600)
        .prop_flat_map(|min| (Just(min), min..=3600))
        .prop_flat_map(|(min, max)| (Just(min), Just(max), min..=max))
}

// Strategy for generating sparse configs
fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(1u16..=65535),
        prop::option::of(1u16..=65535),
        prop::option::of(1u16..=65535),
        prop::option::of(0u64..1000),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(port, min_port, max_port, timeout, debug)| Config {
            port,
            min_port,
            max_port,
            timeout,
            debug,
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn prop_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(result.port, high.port.or(low.port));
        prop_assert_eq!(result.min_port, high.min_port.or(low.min_port));
        prop_assert_eq!(result.max_port, high.max_port.or(low.max_port));
        prop_assert_eq!(result.timeout, high.timeout.or(low.timeout));
        prop_assert_eq!(result.debug, high.debug.or(low.debug));
    }

    #[test]
    fn prop_merge_is_idempotent(base in config_strategy(), layer in config_strategy()) {
        let mut once = base.clone();
        ConfigMerger::merge_into(&mut once, &layer);
        let mut twice = once.clone();
        ConfigMerger::merge_into(&mut twice, &layer);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_consistent_config_resolves(
        server in 1u16..=65535,
        (min_port, max_port) in port_range_strategy(),
        (min_timeout, max_timeout, timeout) in timeout_strategy(),
    ) {
        let config = Config {
            port: Some(server),
            min_port: Some(min_port),
            max_port: Some(max_port),
            min_timeout: Some(min_timeout),
            max_timeout: Some(max_timeout),
            timeout: Some(timeout),
            ..Default::default()
        };
        let settings = ConfigValidator::resolve(&config, None).unwrap();

        prop_assert_eq!(settings.server_port.value(), server);
        prop_assert_eq!(settings.ports.min().value(), min_port);
        prop_assert_eq!(settings.ports.max().value(), max_port);
        prop_assert_eq!(settings.ports.len(), u32::from(max_port - min_port) + 1);
        prop_assert_eq!(settings.timeouts.min(), min_timeout);
        prop_assert_eq!(settings.timeouts.max(), max_timeout);
        prop_assert_eq!(settings.timeout, timeout);
    }

    #[test]
    fn prop_inverted_port_range_rejected(
        (low, high) in (1u16..65535).prop_flat_map(|low| (Just(low), (low + 1)..=65535)),
    ) {
        let config = Config {
            min_port: Some(high),
            max_port: Some(low),
            ..Default::default()
        };
        prop_assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn prop_timeout_outside_bounds_rejected(
        (min_timeout, max_timeout, _) in timeout_strategy(),
        above in 1u64..1000,
    ) {
        let too_high = Config {
            min_timeout: Some(min_timeout),
            max_timeout: Some(max_timeout),
            timeout: Some(max_timeout + above),
            ..Default::default()
        };
        prop_assert!(ConfigValidator::validate(&too_high).is_err());

        let too_low = Config {
            min_timeout: Some(min_timeout),
            max_timeout: Some(max_timeout),
            timeout: Some(min_timeout - 1),
            ..Default::default()
        };
        prop_assert!(ConfigValidator::validate(&too_low).is_err());
    }
}
