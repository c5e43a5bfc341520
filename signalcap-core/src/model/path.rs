//! Stable, identity-based addressing of snapshot entities and fields.
//!
//! Paths render JSON-pointer style, e.g.
//! `/approaches/NB/lane_groups/NB-T/volume/demand_flow_rate`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ApproachId, LaneGroupId, PhaseId};

/// An addressable entity of the snapshot tree.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum EntityPath {
    Node,
    Phase {
        phase: PhaseId,
    },
    Approach {
        approach: ApproachId,
    },
    LaneGroup {
        approach: ApproachId,
        lane_group: LaneGroupId,
    },
}

impl EntityPath {
    pub fn phase(phase: &PhaseId) -> Self {
        EntityPath::Phase {
            phase: phase.clone(),
        }
    }

    pub fn approach(approach: &ApproachId) -> Self {
        EntityPath::Approach {
            approach: approach.clone(),
        }
    }

    pub fn lane_group(approach: &ApproachId, lane_group: &LaneGroupId) -> Self {
        EntityPath::LaneGroup {
            approach: approach.clone(),
            lane_group: lane_group.clone(),
        }
    }

    pub fn field(self, field: Field) -> FieldPath {
        FieldPath {
            entity: self,
            field: Some(field),
        }
    }

    pub fn whole(self) -> FieldPath {
        FieldPath {
            entity: self,
            field: None,
        }
    }
}

impl fmt::Display for EntityPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityPath::Node => Ok(()),
            EntityPath::Phase { phase } => write!(f, "/timing/phases/{phase}"),
            EntityPath::Approach { approach } => write!(f, "/approaches/{approach}"),
            EntityPath::LaneGroup {
                approach,
                lane_group,
            } => write!(f, "/approaches/{approach}/lane_groups/{lane_group}"),
        }
    }
}

/// Field names, grouped by the entity that owns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    // node
    Position,
    AnalysisPeriod,
    CycleLength,
    // phase
    EffectiveGreen,
    LostTime,
    ControlType,
    // approach
    Direction,
    ApproachPhase,
    // lane group
    Movement,
    Lanes,
    IdealSaturationFlow,
    LaneWidth,
    Grade,
    ParkingManeuvers,
    BusStops,
    PedestrianBicycleFactor,
    AreaType,
    LeftTurnPct,
    RightTurnPct,
    ProgressionFactor,
    UpstreamFiltering,
    LaneGroupPhase,
    // lane group volume
    DemandFlowRate,
    HeavyVehiclePct,
    PeakHourFactor,
}

impl Field {
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Position => "position",
            Field::AnalysisPeriod => "analysis_period_hours",
            Field::CycleLength => "timing/cycle_length",
            Field::EffectiveGreen => "effective_green",
            Field::LostTime => "lost_time",
            Field::ControlType => "control_type",
            Field::Direction => "direction",
            Field::ApproachPhase | Field::LaneGroupPhase => "phase",
            Field::Movement => "movement",
            Field::Lanes => "lanes",
            Field::IdealSaturationFlow => "ideal_saturation_flow",
            Field::LaneWidth => "lane_width",
            Field::Grade => "grade",
            Field::ParkingManeuvers => "parking_maneuvers",
            Field::BusStops => "bus_stops",
            Field::PedestrianBicycleFactor => "pedestrian_bicycle_factor",
            Field::AreaType => "area_type",
            Field::LeftTurnPct => "left_turn_pct",
            Field::RightTurnPct => "right_turn_pct",
            Field::ProgressionFactor => "progression_factor",
            Field::UpstreamFiltering => "upstream_filtering",
            Field::DemandFlowRate => "volume/demand_flow_rate",
            Field::HeavyVehiclePct => "volume/heavy_vehicle_pct",
            Field::PeakHourFactor => "volume/peak_hour_factor",
        }
    }
}

/// A field of an entity, or the entity as a whole when `field` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FieldPath {
    pub entity: EntityPath,
    pub field: Option<Field>,
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.entity, self.field) {
            (EntityPath::Node, None) => f.write_str("/"),
            (entity, None) => write!(f, "{entity}"),
            (entity, Some(field)) => write!(f, "{entity}/{}", field.as_str()),
        }
    }
}
