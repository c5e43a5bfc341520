use geo::Point;

use crate::model::{
    Approach, Direction, LaneGroup, Movement, Node, SignalPhase, Snapshot, TimingPlan, Volume,
};

fn approach(id: &str, direction: Direction, phase: &str, lane_groups: Vec<LaneGroup>) -> Approach {
    Approach {
        id: id.into(),
        direction,
        phase: phase.into(),
        lane_groups,
    }
}

/// One northbound through lane, C = 90 s, g = 30 s
pub(crate) fn single_lane_group(demand: f64) -> Snapshot {
    let node = Node {
        id: "N1".into(),
        position: Point::new(-122.4194, 37.7749),
        analysis_period_hours: 0.25,
        timing: TimingPlan {
            cycle_length: 90.0,
            phases: vec![SignalPhase::new("2", 30.0)],
        },
        approaches: vec![approach(
            "NB",
            Direction::Northbound,
            "2",
            vec![LaneGroup::new("NB-T", 1, Volume::new(demand))],
        )],
    };
    Snapshot::new("baseline", 1, node)
}

/// Four-leg intersection with a protected northbound left
pub(crate) fn four_leg() -> Snapshot {
    let mut shared_right = LaneGroup::new("NB-TR", 2, Volume::new(800.0))
        .with_movement(Movement::ThroughRight);
    shared_right.right_turn_pct = Some(10.0);
    shared_right.lane_width = Some(11.0);

    let mut shared_left = LaneGroup::new("EB-TL", 1, Volume {
        demand_flow_rate: 450.0,
        heavy_vehicle_pct: 5.0,
        peak_hour_factor: 0.92,
    })
    .with_movement(Movement::ThroughLeft);
    shared_left.left_turn_pct = Some(15.0);

    let node = Node {
        id: "N7".into(),
        position: Point::new(-122.4, 37.78),
        analysis_period_hours: 0.25,
        timing: TimingPlan {
            cycle_length: 100.0,
            phases: vec![
                SignalPhase::new("2", 40.0),
                SignalPhase::new("4", 30.0),
                SignalPhase::new("1", 10.0),
            ],
        },
        approaches: vec![
            approach(
                "NB",
                Direction::Northbound,
                "2",
                vec![
                    LaneGroup::new("NB-L", 1, Volume::new(120.0))
                        .with_movement(Movement::Left)
                        .with_phase("1"),
                    shared_right,
                ],
            ),
            approach(
                "SB",
                Direction::Southbound,
                "2",
                vec![LaneGroup::new("SB-T", 2, Volume::new(700.0))],
            ),
            approach("EB", Direction::Eastbound, "4", vec![shared_left]),
            approach(
                "WB",
                Direction::Westbound,
                "4",
                vec![LaneGroup::new("WB-T", 1, Volume::new(500.0))],
            ),
        ],
    };
    Snapshot::new("corridor", 3, node)
}
