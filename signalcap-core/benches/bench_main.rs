use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use geo::Point;
use signalcap_core::prelude::*;

fn approach(id: &str, direction: Direction, phase: &str, groups: &[(&str, u32, f64)]) -> Approach {
    Approach {
        id: id.into(),
        direction,
        phase: phase.into(),
        lane_groups: groups
            .iter()
            .map(|&(group, lanes, demand)| LaneGroup::new(group, lanes, Volume::new(demand)))
            .collect(),
    }
}

fn four_leg() -> Snapshot {
    let node = Node {
        id: "bench".into(),
        position: Point::new(0.0, 0.0),
        analysis_period_hours: 0.25,
        timing: TimingPlan {
            cycle_length: 120.0,
            phases: vec![SignalPhase::new("2", 50.0), SignalPhase::new("4", 50.0)],
        },
        approaches: vec![
            approach("NB", Direction::Northbound, "2", &[("NB-L", 1, 150.0), ("NB-T", 3, 1400.0)]),
            approach("SB", Direction::Southbound, "2", &[("SB-L", 1, 120.0), ("SB-T", 3, 1250.0)]),
            approach("EB", Direction::Eastbound, "4", &[("EB-L", 1, 90.0), ("EB-T", 2, 800.0)]),
            approach("WB", Direction::Westbound, "4", &[("WB-L", 1, 110.0), ("WB-T", 2, 950.0)]),
        ],
    };
    Snapshot::new("bench", 1, node)
}

fn bench_run(c: &mut Criterion) {
    let snapshot = four_leg();
    let mut config = EngineConfig::new(EngineVersion::current());
    let at = chrono::Utc::now();

    c.bench_function("run_four_leg_parallel", |b| {
        b.iter(|| run_with_config(black_box(&snapshot), &config, at));
    });
    config.parallel = false;
    c.bench_function("run_four_leg_sequential", |b| {
        b.iter(|| run_with_config(black_box(&snapshot), &config, at));
    });
}

fn bench_diff(c: &mut Criterion) {
    let a = four_leg();
    let mut b = a.clone();
    b.version = 2;
    b.node.timing.cycle_length = 110.0;
    b.node.approaches[2].lane_groups[1].lanes = 3;
    b.node.approaches[3].lane_groups.pop();

    c.bench_function("diff_four_leg", |bencher| {
        bencher.iter(|| diff(black_box(&a), black_box(&b)));
    });
    let forward = diff(&a, &b).unwrap();
    c.bench_function("apply_diff_four_leg", |bencher| {
        bencher.iter(|| apply_diff(black_box(&a), black_box(&forward)));
    });
}

criterion_group!(benches, bench_run, bench_diff);
criterion_main!(benches);
