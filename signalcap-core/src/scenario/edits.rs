use serde::{Deserialize, Serialize};

use crate::model::{
    ApproachId, EntityPath, Field, LaneGroup, LaneGroupId, MAX_LANES, PhaseId, SignalPhase,
    Snapshot,
};
use crate::Error;

/// Relative change to a lane group's hourly demand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemandAdjustment {
    /// Adds veh/h (negative to remove), never going below zero
    Add(f64),
    /// Multiplies by a non-negative factor
    Scale(f64),
}

impl DemandAdjustment {
    /// Reason the adjustment cannot be applied to any demand, if one exists
    fn fault(self) -> Option<String> {
        match self {
            DemandAdjustment::Add(delta) if !delta.is_finite() => {
                Some(format!("demand change must be a finite number, got {delta}"))
            }
            DemandAdjustment::Scale(factor) if !(factor.is_finite() && factor >= 0.0) => {
                Some(format!("scale factor must be non-negative, got {factor}"))
            }
            _ => None,
        }
    }

    fn apply(self, demand: f64) -> f64 {
        match self {
            DemandAdjustment::Add(delta) => (demand + delta).max(0.0),
            DemandAdjustment::Scale(factor) => demand * factor,
        }
    }
}

/// One typed modification of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScenarioEdit {
    SetLanes {
        approach: ApproachId,
        lane_group: LaneGroupId,
        lanes: u32,
    },
    AddLane {
        approach: ApproachId,
        lane_group: LaneGroupId,
    },
    RemoveLane {
        approach: ApproachId,
        lane_group: LaneGroupId,
    },
    SetDemand {
        approach: ApproachId,
        lane_group: LaneGroupId,
        demand_flow_rate: f64,
    },
    AdjustDemand {
        approach: ApproachId,
        lane_group: LaneGroupId,
        adjustment: DemandAdjustment,
    },
    RetimePhase {
        phase: PhaseId,
        #[serde(default)]
        effective_green: Option<f64>,
        #[serde(default)]
        lost_time: Option<f64>,
    },
    SetCycleLength {
        cycle_length: f64,
    },
}

impl ScenarioEdit {
    /// Applies the edit in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] addressing the entity or field the
    /// edit could not be applied to. `snapshot` may be partially modified.
    pub fn apply(&self, snapshot: &mut Snapshot) -> Result<(), Error> {
        match self {
            ScenarioEdit::SetLanes {
                approach,
                lane_group,
                lanes,
            } => {
                let group = lane_group_mut(snapshot, approach, lane_group)?;
                set_lanes(group, approach, *lanes)
            }
            ScenarioEdit::AddLane {
                approach,
                lane_group,
            } => {
                let group = lane_group_mut(snapshot, approach, lane_group)?;
                let lanes = group.lanes.saturating_add(1);
                set_lanes(group, approach, lanes)
            }
            ScenarioEdit::RemoveLane {
                approach,
                lane_group,
            } => {
                let group = lane_group_mut(snapshot, approach, lane_group)?;
                if group.lanes <= 1 {
                    return Err(Error::invalid_input(
                        lanes_path(approach, &group.id),
                        "cannot remove the last lane of a lane group",
                    ));
                }
                group.lanes -= 1;
                Ok(())
            }
            ScenarioEdit::SetDemand {
                approach,
                lane_group,
                demand_flow_rate,
            } => {
                let group = lane_group_mut(snapshot, approach, lane_group)?;
                set_demand(group, approach, *demand_flow_rate)
            }
            ScenarioEdit::AdjustDemand {
                approach,
                lane_group,
                adjustment,
            } => {
                if let Some(reason) = adjustment.fault() {
                    return Err(Error::invalid_input(
                        EntityPath::lane_group(approach, lane_group)
                            .field(Field::DemandFlowRate)
                            .to_string(),
                        reason,
                    ));
                }
                let group = lane_group_mut(snapshot, approach, lane_group)?;
                let demand = adjustment.apply(group.volume.demand_flow_rate);
                set_demand(group, approach, demand)
            }
            ScenarioEdit::RetimePhase {
                phase,
                effective_green,
                lost_time,
            } => {
                if effective_green.is_none() && lost_time.is_none() {
                    return Err(Error::invalid_input(
                        EntityPath::phase(phase).whole().to_string(),
                        "retiming needs an effective green or a lost time",
                    ));
                }
                let target = snapshot.node.timing.phase_mut(phase).ok_or_else(|| {
                    Error::invalid_input(
                        EntityPath::phase(phase).whole().to_string(),
                        format!("phase {phase} does not exist"),
                    )
                })?;
                retime(target, *effective_green, *lost_time)
            }
            ScenarioEdit::SetCycleLength { cycle_length } => {
                if !(cycle_length.is_finite() && *cycle_length > 0.0) {
                    return Err(Error::invalid_input(
                        EntityPath::Node.field(Field::CycleLength).to_string(),
                        format!("cycle length must be positive, got {cycle_length}"),
                    ));
                }
                snapshot.node.timing.cycle_length = *cycle_length;
                Ok(())
            }
        }
    }
}

fn lane_group_mut<'a>(
    snapshot: &'a mut Snapshot,
    approach: &ApproachId,
    lane_group: &LaneGroupId,
) -> Result<&'a mut LaneGroup, Error> {
    let entity = EntityPath::lane_group(approach, lane_group);
    snapshot
        .node
        .approach_mut(approach)
        .ok_or_else(|| {
            Error::invalid_input(
                EntityPath::approach(approach).whole().to_string(),
                format!("approach {approach} does not exist"),
            )
        })?
        .lane_group_mut(lane_group)
        .ok_or_else(|| {
            Error::invalid_input(
                entity.whole().to_string(),
                format!("lane group {lane_group} does not exist"),
            )
        })
}

fn lanes_path(approach: &ApproachId, lane_group: &LaneGroupId) -> String {
    EntityPath::lane_group(approach, lane_group)
        .field(Field::Lanes)
        .to_string()
}

fn set_lanes(group: &mut LaneGroup, approach: &ApproachId, lanes: u32) -> Result<(), Error> {
    if lanes == 0 || lanes > MAX_LANES {
        return Err(Error::invalid_input(
            lanes_path(approach, &group.id),
            format!("expected 1 to {MAX_LANES} lanes, got {lanes}"),
        ));
    }
    group.lanes = lanes;
    Ok(())
}

fn set_demand(group: &mut LaneGroup, approach: &ApproachId, demand: f64) -> Result<(), Error> {
    if !(demand.is_finite() && demand >= 0.0) {
        return Err(Error::invalid_input(
            EntityPath::lane_group(approach, &group.id)
                .field(Field::DemandFlowRate)
                .to_string(),
            format!("demand flow rate must be non-negative, got {demand}"),
        ));
    }
    group.volume.demand_flow_rate = demand;
    Ok(())
}

fn retime(
    phase: &mut SignalPhase,
    effective_green: Option<f64>,
    lost_time: Option<f64>,
) -> Result<(), Error> {
    let entity = EntityPath::phase(&phase.id);
    for (value, field) in [
        (effective_green, Field::EffectiveGreen),
        (lost_time, Field::LostTime),
    ] {
        if let Some(value) = value {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::invalid_input(
                    entity.clone().field(field).to_string(),
                    format!("must be a non-negative number of seconds, got {value}"),
                ));
            }
        }
    }
    if let Some(green) = effective_green {
        phase.effective_green = green;
    }
    if let Some(lost) = lost_time {
        phase.lost_time = lost;
    }
    Ok(())
}
