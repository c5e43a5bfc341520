use geo::Point;
use signalcap::prelude::*;

fn intersection(scenario: &str, demand: f64, green: f64) -> Snapshot {
    let node = Node {
        id: "oak-and-elm".into(),
        position: Point::new(-71.0589, 42.3601),
        analysis_period_hours: 0.25,
        timing: TimingPlan {
            cycle_length: 90.0,
            phases: vec![SignalPhase::new("2", green), SignalPhase::new("4", 30.0)],
        },
        approaches: vec![
            Approach {
                id: "NB".into(),
                direction: Direction::Northbound,
                phase: "2".into(),
                lane_groups: vec![LaneGroup::new("NB-T", 1, Volume::new(demand))],
            },
            Approach {
                id: "EB".into(),
                direction: Direction::Eastbound,
                phase: "4".into(),
                lane_groups: vec![LaneGroup::new("EB-T", 1, Volume::new(350.0))],
            },
        ],
    };
    Snapshot::new(scenario, 1, node)
}

fn config() -> EngineConfig {
    EngineConfig::with_version("0.3.0").unwrap()
}

#[test]
fn batch_results_follow_input_order() {
    let snapshots = vec![
        intersection("low", 300.0, 30.0),
        intersection("broken", 300.0, 0.0),
        intersection("high", 700.0, 30.0),
    ];
    let results = run_batch(&snapshots, &config());

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().scenario_id().as_str(), "low");
    assert_eq!(
        results[1].as_ref().unwrap_err().kind(),
        ErrorKind::InvalidCapacity
    );
    let high = results[2].as_ref().unwrap();
    assert_eq!(high.scenario_id().as_str(), "high");
    assert_eq!(
        high.lane_group(&"NB".into(), &"NB-T".into()).unwrap().los,
        Los::F
    );
}

#[test]
fn batch_matches_individual_runs() {
    let snapshots: Vec<_> = (0..12)
        .map(|step| intersection("sweep", 100.0 + 50.0 * f64::from(step), 30.0))
        .collect();
    let batch = run_batch(&snapshots, &config());
    for (snapshot, result) in snapshots.iter().zip(batch) {
        let single = run(snapshot, "0.3.0").unwrap();
        assert!(result.unwrap().same_outcome(&single));
    }
}

#[test]
fn comparison_bundles_diff_and_both_runs() {
    let base = intersection("base", 400.0, 30.0);
    let mut alternative = intersection("retimed", 400.0, 36.0);
    alternative.version = 2;

    let comparison = compare_scenarios(&base, &alternative, &config()).unwrap();
    assert_eq!(comparison.input_diff.len(), 1);
    assert_eq!(
        comparison.input_diff.changes[0].pointer(),
        "/timing/phases/2/effective_green"
    );
    assert_eq!(comparison.base.scenario_id().as_str(), "base");
    assert_eq!(comparison.alternative.scenario_version(), 2);
    assert_eq!(comparison.base.created_at(), comparison.alternative.created_at());

    let nb = comparison
        .results
        .lane_groups
        .iter()
        .find(|group| group.id.as_str() == "NB-T")
        .unwrap();
    assert!(nb.control_delay.delta < 0.0);
    assert!(nb.vc_ratio.delta < 0.0);
}

#[test]
fn comparison_rejects_different_nodes() {
    let base = intersection("base", 400.0, 30.0);
    let mut other = base.clone();
    other.node.id = "pine-and-elm".into();
    let err = compare_scenarios(&base, &other, &config()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DiffIdentityMismatch);
}

#[test]
fn comparison_is_serializable_for_reports() {
    let base = intersection("base", 400.0, 30.0);
    let alternative = intersection("growth", 520.0, 30.0);
    let comparison = compare_scenarios(&base, &alternative, &config()).unwrap();
    let json = serde_json::to_value(&comparison).unwrap();
    assert_eq!(json["input_diff"]["changes"][0]["kind"], "modified");
    assert!(json["base"]["input_hash"].is_string());
}
