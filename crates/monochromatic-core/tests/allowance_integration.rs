//! Integration tests for the allowance rules.
//!
//! These exercise the evaluator directly and through a file-backed
//! [`Settings`] to make sure stored preferences drive the same decision.

use monochromatic_core::{
    AllowanceConfig, AllowanceEvaluator, FixedPower, MinuteOfDay, Settings, StaticCapability,
    TomlStore,
};
use proptest::prelude::*;

fn m(minutes: i64) -> MinuteOfDay {
    MinuteOfDay::new(minutes).unwrap()
}

fn window(enable: i64, disable: i64) -> AllowanceConfig {
    AllowanceConfig {
        time_window_enabled: true,
        enable_minute: m(enable),
        disable_minute: m(disable),
        ..AllowanceConfig::default()
    }
}

#[test]
fn test_night_window_examples() {
    let eval = AllowanceEvaluator::new();
    let cfg = window(1320, 360);

    assert!(eval.is_time_allowed(m(1380), &cfg));
    assert!(eval.is_time_allowed(m(180), &cfg));
    assert!(!eval.is_time_allowed(m(700), &cfg));
    assert!(!eval.is_time_allowed(m(1320), &cfg));
    assert!(!eval.is_time_allowed(m(360), &cfg));
}

#[test]
fn test_file_backed_settings_drive_decision() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");

    let writer = Settings::new(TomlStore::new(&path), StaticCapability(true));
    writer.set_enable_at_time(true).unwrap();
    writer.set_enable_time("22:00".parse().unwrap()).unwrap();
    writer.set_disable_time("06:00".parse().unwrap()).unwrap();
    writer.set_enable_at_low_battery(true).unwrap();

    // A second accessor over the same file sees the writes immediately.
    let reader = Settings::new(TomlStore::new(&path), StaticCapability(true));
    let charged = FixedPower::percent(80);
    let drained = FixedPower::percent(15);

    assert!(reader.is_allowed_at(m(1380), &charged));
    assert!(!reader.is_allowed_at(m(700), &charged));
    assert!(reader.is_allowed_at(m(700), &drained));

    let allowance = reader.evaluate_at(m(180), &drained);
    assert_eq!(allowance.reasons(), vec!["time_window", "low_battery"]);
}

#[test]
fn test_hand_edited_file_is_honoured() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.toml");
    std::fs::write(
        &path,
        "always_on = false\nenable_with_low_battery = true\nenable_with_low_battery_amount = 60\n",
    )
    .unwrap();

    let settings = Settings::new(TomlStore::new(&path), StaticCapability(true));
    assert!(settings.is_allowed_at(m(700), &FixedPower::unknown()));
}

fn arb_config() -> impl Strategy<Value = AllowanceConfig> {
    (
        any::<bool>(),
        any::<bool>(),
        0i64..1440,
        0i64..1440,
        any::<bool>(),
        0u8..=100,
    )
        .prop_map(|(always_on, tw, enable, disable, lb, threshold)| AllowanceConfig {
            always_on,
            time_window_enabled: tw,
            enable_minute: m(enable),
            disable_minute: m(disable),
            low_battery_enabled: lb,
            low_battery_threshold: threshold,
        })
}

proptest! {
    #[test]
    fn prop_strictly_inside_plain_window_is_allowed(
        enable in 0i64..1438,
        gap in 2i64..1440,
        offset in 1i64..1439,
    ) {
        let disable = (enable + gap).min(1439);
        prop_assume!(disable - enable >= 2);
        let now = enable + 1 + offset % (disable - enable - 1);
        let eval = AllowanceEvaluator::new();
        let cfg = window(enable, disable);
        prop_assert!(eval.is_time_allowed(m(now), &cfg));
        prop_assert!(!eval.is_time_allowed(m(enable), &cfg));
        prop_assert!(!eval.is_time_allowed(m(disable), &cfg));
    }

    #[test]
    fn prop_boundaries_never_allowed(enable in 0i64..1440, disable in 0i64..1440) {
        let eval = AllowanceEvaluator::new();
        let cfg = window(enable, disable);
        prop_assert!(!eval.is_time_allowed(m(enable), &cfg));
        prop_assert!(!eval.is_time_allowed(m(disable), &cfg));
    }

    #[test]
    fn prop_disabled_window_never_allows(
        enable in 0i64..1440,
        disable in 0i64..1440,
        now in 0i64..1440,
    ) {
        let cfg = AllowanceConfig { time_window_enabled: false, ..window(enable, disable) };
        prop_assert!(!AllowanceEvaluator::new().is_time_allowed(m(now), &cfg));
    }

    #[test]
    fn prop_always_on_wins(cfg in arb_config(), now in 0i64..1440, battery in proptest::option::of(0u8..=100)) {
        let cfg = AllowanceConfig { always_on: true, ..cfg };
        prop_assert!(AllowanceEvaluator::new().is_allowed(m(now), battery, &cfg));
    }

    #[test]
    fn prop_evaluation_is_idempotent(cfg in arb_config(), now in 0i64..1440, battery in proptest::option::of(0u8..=100)) {
        let eval = AllowanceEvaluator::new();
        let first = eval.is_allowed(m(now), battery, &cfg);
        for _ in 0..5 {
            prop_assert_eq!(eval.is_allowed(m(now), battery, &cfg), first);
        }
        prop_assert_eq!(eval.evaluate(m(now), battery, &cfg).is_allowed(), first);
    }

    #[test]
    fn prop_unknown_battery_matches_fifty(cfg in arb_config(), now in 0i64..1440) {
        let eval = AllowanceEvaluator::new();
        prop_assert_eq!(
            eval.is_allowed(m(now), None, &cfg),
            eval.is_allowed(m(now), Some(50), &cfg)
        );
    }
}
