mod common;

use chrono::{TimeZone, Utc};
use signalcap_core::prelude::*;

use common::{corridor, lane_group_mut, single_lane_group};

const VERSION: &str = "0.3.0";

fn config() -> EngineConfig {
    EngineConfig::with_version(VERSION).unwrap()
}

/// Control delay per the published HCM uniform and incremental delay
/// equations, for the single lane group fixture.
fn published_delay(demand: f64) -> f64 {
    let cycle: f64 = 90.0;
    let green_ratio: f64 = 30.0 / 90.0;
    let capacity = 1900.0 * green_ratio;
    let x: f64 = demand / capacity;
    let d1 = 0.5 * cycle * (1.0 - green_ratio).powi(2) / (1.0 - x.min(1.0) * green_ratio);
    let d2 = 900.0 * 0.25 * ((x - 1.0) + ((x - 1.0).powi(2) + 8.0 * 0.5 * x / (capacity * 0.25)).sqrt());
    d1 + d2
}

#[test]
fn undersaturated_single_lane_group() {
    let result = run(&single_lane_group(400.0), VERSION).unwrap();
    let group = &result.lane_groups()[0];

    assert_eq!(group.saturation.total, 1900.0);
    assert!((group.capacity - 633.333_333).abs() < 1e-3);
    assert!((group.vc_ratio - 0.632).abs() < 1e-3);
    assert!((group.control_delay - published_delay(400.0)).abs() < 1e-6);
    assert!((group.control_delay - 30.07).abs() < 0.01);
    assert_eq!(group.regime, DelayRegime::Undersaturated);
    assert!(group.los <= Los::C);
    assert_eq!(result.los(), group.los);
}

#[test]
fn oversaturated_single_lane_group() {
    let under = run(&single_lane_group(400.0), VERSION).unwrap();
    let over = run(&single_lane_group(700.0), VERSION).unwrap();
    let group = &over.lane_groups()[0];

    assert!((group.vc_ratio - 1.105).abs() < 1e-3);
    assert!(group.incremental_delay > under.lane_groups()[0].incremental_delay);
    assert!((group.uniform_delay - 30.0).abs() < 1e-9);
    assert!((group.control_delay - published_delay(700.0)).abs() < 1e-6);
    assert_eq!(group.regime, DelayRegime::Oversaturated);
    assert_eq!(group.los, Los::F);
    assert_eq!(over.los(), Los::F);
}

#[test]
fn identical_inputs_reproduce_identical_results() {
    let at = Utc.with_ymd_and_hms(2026, 3, 14, 8, 30, 0).unwrap();
    let first = run_with_config(&corridor(), &config(), at).unwrap();
    let second = run_with_config(&corridor(), &config(), at).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.input_hash().as_str().len(), 64);

    let later = run(&corridor(), VERSION).unwrap();
    assert!(first.same_outcome(&later));
    for (a, b) in first.lane_groups().iter().zip(later.lane_groups()) {
        assert_eq!(a.control_delay.to_bits(), b.control_delay.to_bits());
    }
}

#[test]
fn input_hash_ignores_representation_order() {
    let base = run(&corridor(), VERSION).unwrap();

    let mut value: serde_json::Value = serde_json::from_str(common::CORRIDOR).unwrap();
    value["node"]["approaches"]
        .as_array_mut()
        .unwrap()
        .reverse();
    value["node"]["timing"]["phases"]
        .as_array_mut()
        .unwrap()
        .reverse();
    // serde_json re-emits object keys in sorted order, unlike the literal
    let rewritten: Snapshot = serde_json::from_str(&value.to_string()).unwrap();
    let reordered = run(&rewritten, VERSION).unwrap();

    assert_eq!(base.input_hash(), reordered.input_hash());
    assert!(base.same_outcome(&reordered));
}

#[test]
fn input_hash_tracks_content_but_not_scenario_identity() {
    let base = corridor();
    let mut relabelled = base.clone();
    relabelled.scenario_id = "main-st-copy".into();
    relabelled.version = 9;
    let mut changed = base.clone();
    lane_group_mut(&mut changed, "EB", "EB-T").volume.demand_flow_rate = 401.0;

    let hash = |snapshot: &Snapshot| run(snapshot, VERSION).unwrap().input_hash().clone();
    assert_eq!(hash(&base), hash(&relabelled));
    assert_ne!(hash(&base), hash(&changed));
}

#[test]
fn explicit_defaults_hash_like_omitted_ones() {
    let mut explicit = corridor();
    for approach in &mut explicit.node.approaches {
        for group in &mut approach.lane_groups {
            group.progression_factor = Some(group.progression_factor.unwrap_or(1.0));
            group.upstream_filtering = Some(group.upstream_filtering.unwrap_or(1.0));
        }
    }
    assert_eq!(
        run(&corridor(), VERSION).unwrap().input_hash(),
        run(&explicit, VERSION).unwrap().input_hash()
    );
}

#[test]
fn results_carry_the_requested_engine_version() {
    let old = run(&corridor(), "0.2.1").unwrap();
    let new = run(&corridor(), "1.0.0-rc.1").unwrap();
    assert_eq!(old.engine_version().as_str(), "0.2.1");
    assert_eq!(new.engine_version().as_str(), "1.0.0-rc.1");
    assert_eq!(old.input_hash(), new.input_hash());
}

#[test]
fn node_delay_is_volume_weighted_over_lane_groups() {
    let result = run(&corridor(), VERSION).unwrap();
    let groups = result.lane_groups();
    assert_eq!(groups.len(), 5);
    assert_eq!(result.approaches().len(), 4);

    let demand: f64 = groups.iter().map(|group| group.adjusted_demand).sum();
    let weighted: f64 = groups
        .iter()
        .map(|group| group.control_delay * group.adjusted_demand)
        .sum();
    assert!((result.total_demand() - demand).abs() < 1e-9);
    assert!((result.control_delay() - weighted / demand).abs() < 1e-9);
    assert_eq!(result.los(), classify(result.control_delay()));
    assert!(result.critical_vc().unwrap() > 0.0);
}

#[test]
fn adjustment_factors_reduce_saturation_flow() {
    let result = run(&corridor(), VERSION).unwrap();
    let eb = result.lane_group(&"EB".into(), &"EB-T".into()).unwrap();
    let factors = eb.saturation.factors;

    assert_eq!(factors.area_type, 0.90);
    assert!((factors.parking - 0.8).abs() < 1e-12);
    assert!((factors.left_turn - 1.0 / 1.005).abs() < 1e-12);
    assert!((factors.right_turn - 0.9775).abs() < 1e-12);
    assert!(eb.saturation.total < 1900.0 * 0.9 * 0.8);

    let nb_left = result.lane_group(&"NB".into(), &"NB-L".into()).unwrap();
    assert_eq!(nb_left.phase.as_str(), "1");
    assert_eq!(nb_left.saturation.factors.left_turn, 0.95);
}

#[test]
fn zero_green_reports_the_failing_lane_group() {
    let mut snapshot = corridor();
    snapshot.node.timing.phases[0].effective_green = 0.0;

    let err = run(&snapshot, VERSION).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCapacity);
    match err {
        Error::LaneGroup {
            approach,
            lane_group,
            ..
        } => {
            assert_eq!(approach.as_str(), "NB");
            assert_eq!(lane_group.as_str(), "NB-L");
        }
        other => panic!("expected a lane group error, got {other}"),
    }
}

#[test]
fn green_longer_than_the_cycle_is_a_timing_error() {
    let mut snapshot = single_lane_group(400.0);
    snapshot.node.timing.phases[0].effective_green = 95.0;
    let err = run(&snapshot, VERSION).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTiming);
}

#[test]
fn invalid_volumes_are_rejected_before_calculation() {
    let mut snapshot = corridor();
    lane_group_mut(&mut snapshot, "SB", "SB-T").volume.peak_hour_factor = 0.0;
    let err = run(&snapshot, VERSION).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().contains("/approaches/SB/lane_groups/SB-T/volume/peak_hour_factor"));

    let mut snapshot = corridor();
    lane_group_mut(&mut snapshot, "SB", "SB-T").volume.demand_flow_rate = -1.0;
    assert_eq!(run(&snapshot, VERSION).unwrap_err().kind(), ErrorKind::InvalidInput);
}

#[test]
fn unknown_fields_are_rejected_at_the_boundary() {
    let json = common::CORRIDOR.replace("\"grade\": -2.0", "\"grade\": -2.0, \"turbo\": true");
    assert!(serde_json::from_str::<Snapshot>(&json).is_err());
}

#[test]
fn result_bundle_survives_persistence() {
    let result = run(&corridor(), VERSION).unwrap();
    let stored = serde_json::to_string(&result).unwrap();
    let loaded: NodeResult = serde_json::from_str(&stored).unwrap();
    assert_eq!(loaded.input_hash(), result.input_hash());
    assert_eq!(loaded.engine_version(), result.engine_version());
    assert_eq!(loaded.lane_groups().len(), result.lane_groups().len());
}
