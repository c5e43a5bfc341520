#![allow(dead_code)]

use geo::Point;
use signalcap_core::prelude::*;

/// Four-leg arterial crossing as delivered by the persistence layer.
/// Lane groups in document order: NB-L, NB-T, EB-T, SB-T, WB-TR.
pub const CORRIDOR: &str = r#"{
    "scenario_id": "main-st-baseline",
    "version": 1,
    "node": {
        "id": "main-and-5th",
        "position": { "x": -93.265, "y": 44.9778 },
        "timing": {
            "cycle_length": 100.0,
            "phases": [
                { "id": "1", "effective_green": 12.0, "control_type": "actuated_coordinated" },
                { "id": "2", "effective_green": 38.0, "control_type": "actuated_coordinated" },
                { "id": "4", "effective_green": 34.0 }
            ]
        },
        "approaches": [
            {
                "id": "NB", "direction": "NB", "phase": "2",
                "lane_groups": [
                    {
                        "id": "NB-L", "movement": "left", "lanes": 1, "phase": "1",
                        "volume": { "demand_flow_rate": 140.0, "peak_hour_factor": 0.92 }
                    },
                    {
                        "id": "NB-T", "movement": "through_right", "lanes": 2,
                        "lane_width": 11.0, "right_turn_pct": 12.0,
                        "volume": { "demand_flow_rate": 650.0, "heavy_vehicle_pct": 4.0, "peak_hour_factor": 0.92 }
                    }
                ]
            },
            {
                "id": "EB", "direction": "EB", "phase": "4",
                "lane_groups": [
                    {
                        "id": "EB-T", "movement": "all", "lanes": 1, "area_type": "cbd",
                        "left_turn_pct": 10.0, "right_turn_pct": 15.0, "parking_maneuvers": 20.0,
                        "volume": { "demand_flow_rate": 400.0 }
                    }
                ]
            },
            {
                "id": "SB", "direction": "SB", "phase": "2",
                "lane_groups": [
                    {
                        "id": "SB-T", "lanes": 2, "grade": -2.0,
                        "volume": { "demand_flow_rate": 720.0, "peak_hour_factor": 0.95 }
                    }
                ]
            },
            {
                "id": "WB", "direction": "WB", "phase": "4",
                "lane_groups": [
                    {
                        "id": "WB-TR", "movement": "through_right", "lanes": 1,
                        "right_turn_pct": 20.0, "bus_stops": 6.0,
                        "volume": { "demand_flow_rate": 380.0 }
                    }
                ]
            }
        ]
    }
}"#;

pub fn corridor() -> Snapshot {
    serde_json::from_str(CORRIDOR).unwrap()
}

/// One northbound through lane: C = 90 s, g = 30 s, s0 = 1900 veh/h/ln
pub fn single_lane_group(demand: f64) -> Snapshot {
    let node = Node {
        id: "N1".into(),
        position: Point::new(-122.4194, 37.7749),
        analysis_period_hours: 0.25,
        timing: TimingPlan {
            cycle_length: 90.0,
            phases: vec![SignalPhase::new("2", 30.0)],
        },
        approaches: vec![Approach {
            id: "NB".into(),
            direction: Direction::Northbound,
            phase: "2".into(),
            lane_groups: vec![LaneGroup::new("NB-T", 1, Volume::new(demand))],
        }],
    };
    Snapshot::new("single", 1, node)
}

pub fn lane_group_mut<'a>(snapshot: &'a mut Snapshot, approach: &str, id: &str) -> &'a mut LaneGroup {
    snapshot
        .node
        .approach_mut(&approach.into())
        .and_then(|approach| approach.lane_group_mut(&id.into()))
        .unwrap()
}
