//! Resolution of a validated snapshot into the analysis input tree.
//!
//! The resolved tree has every default applied, every adjustment factor
//! materialised and every collection ordered by identifier. It is what the
//! calculators consume and what the input hash is computed over.

use geo::Point;
use serde::Serialize;

use crate::analysis::saturation::AdjustmentFactors;
use crate::model::{
    ApproachId, ControlType, Direction, EntityPath, Field, LaneGroupId, Movement, NodeId,
    PhaseId, Snapshot, Volume,
};
use crate::Error;

/// Progression factor assumed when none is given (no progression benefit)
pub const DEFAULT_PROGRESSION_FACTOR: f64 = 1.0;
/// Upstream filtering factor for an isolated intersection
pub const DEFAULT_UPSTREAM_FILTERING: f64 = 1.0;

/// Timing seen by one lane group: its phase within the shared cycle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseTiming {
    pub id: PhaseId,
    pub cycle_length: f64,
    pub effective_green: f64,
    pub lost_time: f64,
    pub control_type: ControlType,
}

impl PhaseTiming {
    /// `g / C`
    pub fn green_ratio(&self) -> f64 {
        self.effective_green / self.cycle_length
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLaneGroup {
    pub approach: ApproachId,
    pub id: LaneGroupId,
    pub movement: Movement,
    pub phase: PhaseId,
    pub lanes: u32,
    pub ideal_saturation_flow: f64,
    pub factors: AdjustmentFactors,
    pub volume: Volume,
    pub progression_factor: f64,
    pub upstream_filtering: f64,
    pub analysis_period_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedApproach {
    pub id: ApproachId,
    pub direction: Direction,
    pub lane_groups: Vec<ResolvedLaneGroup>,
}

/// Fully resolved intersection. Scenario identity and version are not part
/// of it, so identical intersections hash identically across scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedIntersection {
    pub node: NodeId,
    pub position: Point<f64>,
    pub analysis_period_hours: f64,
    pub cycle_length: f64,
    pub phases: Vec<PhaseTiming>,
    pub approaches: Vec<ResolvedApproach>,
}

impl ResolvedIntersection {
    pub fn lane_groups(&self) -> impl Iterator<Item = &ResolvedLaneGroup> {
        self.approaches
            .iter()
            .flat_map(|approach| approach.lane_groups.iter())
    }

    pub fn phase(&self, id: &PhaseId) -> Option<&PhaseTiming> {
        self.phases
            .binary_search_by(|phase| phase.id.cmp(id))
            .ok()
            .map(|index| &self.phases[index])
    }
}

/// Resolves a snapshot that has passed [`Snapshot::validate`].
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if a lane group references an undefined phase.
pub fn resolve(snapshot: &Snapshot) -> Result<ResolvedIntersection, Error> {
    let canonical = snapshot.canonical();
    let node = &canonical.node;
    let cycle_length = node.timing.cycle_length;

    let phases: Vec<PhaseTiming> = node
        .timing
        .phases
        .iter()
        .map(|phase| PhaseTiming {
            id: phase.id.clone(),
            cycle_length,
            effective_green: phase.effective_green,
            lost_time: phase.lost_time,
            control_type: phase.control_type,
        })
        .collect();

    let approaches = node
        .approaches
        .iter()
        .map(|approach| {
            let lane_groups = approach
                .lane_groups
                .iter()
                .map(|group| {
                    let phase = approach.phase_for(group);
                    if node.timing.phase(phase).is_none() {
                        return Err(Error::invalid_input(
                            EntityPath::lane_group(&approach.id, &group.id)
                                .field(Field::LaneGroupPhase)
                                .to_string(),
                            format!("undefined phase {phase}"),
                        ));
                    }
                    Ok(ResolvedLaneGroup {
                        approach: approach.id.clone(),
                        id: group.id.clone(),
                        movement: group.movement,
                        phase: phase.clone(),
                        lanes: group.lanes,
                        ideal_saturation_flow: group.ideal_saturation_flow,
                        factors: AdjustmentFactors::for_lane_group(group),
                        volume: group.volume.clone(),
                        progression_factor: group
                            .progression_factor
                            .unwrap_or(DEFAULT_PROGRESSION_FACTOR),
                        upstream_filtering: group
                            .upstream_filtering
                            .unwrap_or(DEFAULT_UPSTREAM_FILTERING),
                        analysis_period_hours: node.analysis_period_hours,
                    })
                })
                .collect::<Result<Vec<_>, Error>>()?;
            Ok(ResolvedApproach {
                id: approach.id.clone(),
                direction: approach.direction,
                lane_groups,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(ResolvedIntersection {
        node: node.id.clone(),
        position: node.position,
        analysis_period_hours: node.analysis_period_hours,
        cycle_length,
        phases,
        approaches,
    })
}
