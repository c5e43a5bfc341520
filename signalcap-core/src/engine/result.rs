//! Result bundle of one orchestrator run.
//!
//! A [`NodeResult`] is only built by the orchestrator and exposes read-only
//! accessors, so the engine version and input hash it carries always belong
//! to the numbers next to them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::InputHash;
use crate::analysis::{DelayRegime, Los, SaturationFlow};
use crate::config::EngineVersion;
use crate::model::{ApproachId, Direction, LaneGroupId, NodeId, PhaseId, ScenarioId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaneGroupResult {
    pub approach: ApproachId,
    pub id: LaneGroupId,
    pub phase: PhaseId,
    pub saturation: SaturationFlow,
    /// veh/h
    pub capacity: f64,
    pub green_ratio: f64,
    /// Peak 15-minute demand, veh/h
    pub adjusted_demand: f64,
    /// v/s
    pub flow_ratio: f64,
    pub vc_ratio: f64,
    /// s/veh
    pub uniform_delay: f64,
    /// s/veh
    pub incremental_delay: f64,
    pub progression_factor: f64,
    /// s/veh
    pub control_delay: f64,
    pub regime: DelayRegime,
    pub los: Los,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproachResult {
    pub id: ApproachId,
    pub direction: Direction,
    /// Adjusted demand over the approach's lane groups, veh/h
    pub demand: f64,
    /// Volume-weighted control delay, s/veh
    pub control_delay: f64,
    pub los: Los,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeResult {
    scenario_id: ScenarioId,
    scenario_version: u32,
    node_id: NodeId,
    engine_version: EngineVersion,
    input_hash: InputHash,
    created_at: DateTime<Utc>,
    control_delay: f64,
    los: Los,
    critical_vc: Option<f64>,
    total_demand: f64,
    approaches: Vec<ApproachResult>,
    lane_groups: Vec<LaneGroupResult>,
}

pub(crate) struct NodeTotals {
    pub control_delay: f64,
    pub los: Los,
    pub critical_vc: Option<f64>,
    pub total_demand: f64,
}

impl NodeResult {
    pub(crate) fn new(
        scenario: (ScenarioId, u32),
        node_id: NodeId,
        audit: (EngineVersion, InputHash, DateTime<Utc>),
        totals: NodeTotals,
        approaches: Vec<ApproachResult>,
        lane_groups: Vec<LaneGroupResult>,
    ) -> Self {
        let (scenario_id, scenario_version) = scenario;
        let (engine_version, input_hash, created_at) = audit;
        Self {
            scenario_id,
            scenario_version,
            node_id,
            engine_version,
            input_hash,
            created_at,
            control_delay: totals.control_delay,
            los: totals.los,
            critical_vc: totals.critical_vc,
            total_demand: totals.total_demand,
            approaches,
            lane_groups,
        }
    }

    pub fn scenario_id(&self) -> &ScenarioId {
        &self.scenario_id
    }

    pub fn scenario_version(&self) -> u32 {
        self.scenario_version
    }

    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    pub fn engine_version(&self) -> &EngineVersion {
        &self.engine_version
    }

    pub fn input_hash(&self) -> &InputHash {
        &self.input_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Volume-weighted control delay over every lane group, s/veh
    pub fn control_delay(&self) -> f64 {
        self.control_delay
    }

    pub fn los(&self) -> Los {
        self.los
    }

    /// Critical intersection v/c, `Xc`. `None` when the lost time of the
    /// serving phases leaves no green in the cycle.
    pub fn critical_vc(&self) -> Option<f64> {
        self.critical_vc
    }

    /// Adjusted demand over all lane groups, veh/h
    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    /// Ordered by approach id
    pub fn approaches(&self) -> &[ApproachResult] {
        &self.approaches
    }

    /// Ordered by approach id, then lane group id
    pub fn lane_groups(&self) -> &[LaneGroupResult] {
        &self.lane_groups
    }

    pub fn approach(&self, id: &ApproachId) -> Option<&ApproachResult> {
        self.approaches.iter().find(|approach| &approach.id == id)
    }

    pub fn lane_group(&self, approach: &ApproachId, id: &LaneGroupId) -> Option<&LaneGroupResult> {
        self.lane_groups
            .iter()
            .find(|group| &group.approach == approach && &group.id == id)
    }

    /// Numeric content equality, ignoring the creation timestamp.
    pub fn same_outcome(&self, other: &NodeResult) -> bool {
        NodeResult {
            created_at: other.created_at,
            ..self.clone()
        } == *other
    }
}
