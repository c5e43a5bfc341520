//! Result-level comparison of two orchestrator runs

use itertools::{EitherOrBoth, Itertools};
use log::warn;
use serde::{Deserialize, Serialize};

use super::SnapshotRef;
use crate::analysis::Los;
use crate::engine::{ApproachResult, LaneGroupResult, NodeResult};
use crate::model::{ApproachId, LaneGroupId, NodeId};
use crate::Error;

/// A quantity before and after, with `delta = after − before`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Delta {
    pub before: f64,
    pub after: f64,
    pub delta: f64,
}

impl Delta {
    pub fn new(before: f64, after: f64) -> Self {
        Self {
            before,
            after,
            delta: after - before,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneGroupComparison {
    pub approach: ApproachId,
    pub id: LaneGroupId,
    pub control_delay: Delta,
    pub vc_ratio: Delta,
    pub los_before: Los,
    pub los_after: Los,
}

impl LaneGroupComparison {
    pub fn los_changed(&self) -> bool {
        self.los_before != self.los_after
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachComparison {
    pub id: ApproachId,
    pub demand: Delta,
    pub control_delay: Delta,
    pub los_before: Los,
    pub los_after: Los,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultComparison {
    pub node: NodeId,
    pub from: SnapshotRef,
    pub to: SnapshotRef,
    /// Differences may stem from the engine rather than the inputs when false
    pub engine_versions_match: bool,
    pub inputs_match: bool,
    pub control_delay: Delta,
    /// Present when both runs define a critical v/c
    pub critical_vc: Option<Delta>,
    pub los_before: Los,
    pub los_after: Los,
    pub approaches: Vec<ApproachComparison>,
    pub lane_groups: Vec<LaneGroupComparison>,
    /// Approaches present in only one of the runs
    pub removed_approaches: Vec<ApproachId>,
    pub added_approaches: Vec<ApproachId>,
    /// Lane groups present in only one of the runs, as (approach, lane group)
    pub removed_lane_groups: Vec<(ApproachId, LaneGroupId)>,
    pub added_lane_groups: Vec<(ApproachId, LaneGroupId)>,
}

/// Compares two runs of the same node, matching approaches and lane groups
/// by identifier.
///
/// # Errors
///
/// Returns [`Error::DiffIdentityMismatch`] if the runs are of different nodes.
pub fn compare_results(a: &NodeResult, b: &NodeResult) -> Result<ResultComparison, Error> {
    if a.node_id() != b.node_id() {
        return Err(Error::DiffIdentityMismatch {
            reason: format!(
                "results of node {} cannot be compared with results of node {}",
                a.node_id(),
                b.node_id()
            ),
        });
    }
    let engine_versions_match = a.engine_version() == b.engine_version();
    if !engine_versions_match {
        warn!(
            "Comparing node {} results from engine {} and {}",
            a.node_id(),
            a.engine_version(),
            b.engine_version()
        );
    }

    let mut comparison = ResultComparison {
        node: a.node_id().clone(),
        from: SnapshotRef {
            scenario_id: a.scenario_id().clone(),
            version: a.scenario_version(),
        },
        to: SnapshotRef {
            scenario_id: b.scenario_id().clone(),
            version: b.scenario_version(),
        },
        engine_versions_match,
        inputs_match: a.input_hash() == b.input_hash(),
        control_delay: Delta::new(a.control_delay(), b.control_delay()),
        critical_vc: a
            .critical_vc()
            .zip(b.critical_vc())
            .map(|(before, after)| Delta::new(before, after)),
        los_before: a.los(),
        los_after: b.los(),
        approaches: Vec::new(),
        lane_groups: Vec::new(),
        removed_approaches: Vec::new(),
        added_approaches: Vec::new(),
        removed_lane_groups: Vec::new(),
        added_lane_groups: Vec::new(),
    };

    let approaches = a
        .approaches()
        .iter()
        .merge_join_by(b.approaches(), |x, y| x.id.cmp(&y.id));
    for pair in approaches {
        match pair {
            EitherOrBoth::Left(x) => comparison.removed_approaches.push(x.id.clone()),
            EitherOrBoth::Right(y) => comparison.added_approaches.push(y.id.clone()),
            EitherOrBoth::Both(x, y) => comparison.approaches.push(compare_approach(x, y)),
        }
    }

    let key = |group: &LaneGroupResult| (group.approach.clone(), group.id.clone());
    let lane_groups = a
        .lane_groups()
        .iter()
        .merge_join_by(b.lane_groups(), |x, y| {
            (&x.approach, &x.id).cmp(&(&y.approach, &y.id))
        });
    for pair in lane_groups {
        match pair {
            EitherOrBoth::Left(x) => comparison.removed_lane_groups.push(key(x)),
            EitherOrBoth::Right(y) => comparison.added_lane_groups.push(key(y)),
            EitherOrBoth::Both(x, y) => comparison.lane_groups.push(LaneGroupComparison {
                approach: x.approach.clone(),
                id: x.id.clone(),
                control_delay: Delta::new(x.control_delay, y.control_delay),
                vc_ratio: Delta::new(x.vc_ratio, y.vc_ratio),
                los_before: x.los,
                los_after: y.los,
            }),
        }
    }

    Ok(comparison)
}

fn compare_approach(x: &ApproachResult, y: &ApproachResult) -> ApproachComparison {
    ApproachComparison {
        id: x.id.clone(),
        demand: Delta::new(x.demand, y.demand),
        control_delay: Delta::new(x.control_delay, y.control_delay),
        los_before: x.los,
        los_after: y.los,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::run;
    use crate::model::{LaneGroup, Volume};
    use crate::test_fixtures::{four_leg, single_lane_group};

    #[test]
    fn same_run_compares_as_unchanged() {
        let result = run(&four_leg(), "1.0.0").unwrap();
        let comparison = compare_results(&result, &result).unwrap();
        assert!(comparison.inputs_match);
        assert!(comparison.engine_versions_match);
        assert_eq!(comparison.control_delay.delta, 0.0);
        assert!(comparison.lane_groups.iter().all(|group| group.control_delay.delta == 0.0));
        assert!(comparison.added_lane_groups.is_empty());
        assert!(comparison.removed_lane_groups.is_empty());
    }

    #[test]
    fn reports_demand_growth_per_lane_group() {
        let base = run(&single_lane_group(400.0), "1.0.0").unwrap();
        let grown = run(&single_lane_group(700.0), "1.0.0").unwrap();
        let comparison = compare_results(&base, &grown).unwrap();

        assert!(!comparison.inputs_match);
        let group = &comparison.lane_groups[0];
        assert!(group.control_delay.delta > 0.0);
        assert!(group.vc_ratio.delta > 0.0);
        assert!(group.los_changed());
        assert_eq!(group.los_after, Los::F);
    }

    #[test]
    fn lists_lane_groups_on_one_side_only() {
        let base = four_leg();
        let mut alternative = base.clone();
        alternative.node.approaches[3]
            .lane_groups
            .push(LaneGroup::new("WB-R", 1, Volume::new(80.0)));

        let comparison = compare_results(
            &run(&base, "1.0.0").unwrap(),
            &run(&alternative, "1.1.0").unwrap(),
        )
        .unwrap();
        assert!(!comparison.engine_versions_match);
        assert_eq!(
            comparison.added_lane_groups,
            vec![(ApproachId::from("WB"), LaneGroupId::from("WB-R"))]
        );
        assert_eq!(comparison.lane_groups.len(), 5);
    }
}
