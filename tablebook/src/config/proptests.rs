//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{BookingConfig, Config, OutputFormat, ReconcileConfig};
use proptest::prelude::*;

fn booking_strategy() -> impl Strategy<Value = BookingConfig> {
    (
        prop::option::of(prop::sample::select(vec![5u16, 10, 15, 30, 60])),
        prop::option::of(0u16..=240),
        prop::option::of(1u16..=240),
        prop::option::of(0u32..=6),
    )
        .prop_map(|(step, lookback, duration, extra)| BookingConfig {
            slot_step_minutes: step,
            lookback_minutes: lookback,
            duration_minutes: duration,
            extra_seats: extra,
            ..Default::default()
        })
}

fn format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop::sample::select(vec![
        OutputFormat::Json,
        OutputFormat::Csv,
        OutputFormat::Tsv,
        OutputFormat::Table,
    ])
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(booking_strategy()),
        prop::option::of(1u64..=3600),
        prop::option::of(any::<bool>()),
        prop::option::of(1u64..=60),
        prop::option::of(format_strategy()),
    )
        .prop_map(|(booking, interval, autoinit, lock_wait, format)| Config {
            booking,
            reconcile: interval.map(|seconds| ReconcileConfig {
                interval_seconds: Some(seconds),
                complete_elapsed: None,
            }),
            disable_autoinit: autoinit,
            maximum_lock_wait_seconds: lock_wait,
            output_format: format,
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        max_shrink_iters: 10000,
        .. ProptestConfig::default()
    })]

    // Set values from the higher layer always win, unset ones never erase
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        prop_assert_eq!(
            result.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(result.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));
        prop_assert_eq!(result.output_format, high.output_format.or(low.output_format));

        let low_booking = low.booking.clone().unwrap_or_default();
        let high_booking = high.booking.clone().unwrap_or_default();
        let merged = result.booking.clone().unwrap_or_default();
        prop_assert_eq!(
            merged.extra_seats,
            high_booking.extra_seats.or(low_booking.extra_seats)
        );
        prop_assert_eq!(
            merged.slot_step_minutes,
            high_booking.slot_step_minutes.or(low_booking.slot_step_minutes)
        );
    }

    // Merging a config into itself changes nothing
    #[test]
    fn config_merge_idempotent(config in config_strategy()) {
        let mut result = config.clone();
        ConfigMerger::merge_into(&mut result, &config);
        prop_assert_eq!(result, config);
    }

    // Merging into an empty config yields the source
    #[test]
    fn config_merge_into_default_is_identity(config in config_strategy()) {
        let mut result = Config::default();
        ConfigMerger::merge_into(&mut result, &config);
        prop_assert_eq!(result, config);
    }

    // YAML round-trip of the whole schema
    #[test]
    fn config_yaml_stable(config in config_strategy()) {
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        prop_assert_eq!(parsed, config);
    }
}
