//! Intersection geometry and demand: node, approaches, lane groups, volumes

use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::{ApproachId, LaneGroupId, NodeId, PhaseId, TimingPlan};

/// Ideal saturation flow rate, passenger cars per hour of green per lane
pub const DEFAULT_IDEAL_SATURATION_FLOW: f64 = 1900.0;
/// Analysis period `T` in hours (15 minutes)
pub const DEFAULT_ANALYSIS_PERIOD: f64 = 0.25;

/// Travel direction of an approach
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "NB")]
    Northbound,
    #[serde(rename = "SB")]
    Southbound,
    #[serde(rename = "EB")]
    Eastbound,
    #[serde(rename = "WB")]
    Westbound,
}

impl Direction {
    pub fn abbreviation(self) -> &'static str {
        match self {
            Direction::Northbound => "NB",
            Direction::Southbound => "SB",
            Direction::Eastbound => "EB",
            Direction::Westbound => "WB",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Movements served by a lane group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    #[default]
    Through,
    Left,
    Right,
    ThroughRight,
    ThroughLeft,
    LeftRight,
    All,
}

impl Movement {
    /// Shared lane group carrying left turns alongside another movement
    pub fn shares_left(self) -> bool {
        matches!(self, Movement::ThroughLeft | Movement::LeftRight | Movement::All)
    }

    /// Shared lane group carrying right turns alongside another movement
    pub fn shares_right(self) -> bool {
        matches!(
            self,
            Movement::ThroughRight | Movement::LeftRight | Movement::All
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaType {
    /// Central business district
    Cbd,
    #[default]
    Other,
}

/// Demand on a lane group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Volume {
    /// Hourly demand, veh/h
    pub demand_flow_rate: f64,
    /// Heavy vehicles, percent of demand
    #[serde(default)]
    pub heavy_vehicle_pct: f64,
    /// Peak-hour factor in (0, 1]
    #[serde(default = "default_peak_hour_factor")]
    pub peak_hour_factor: f64,
}

impl Volume {
    pub fn new(demand_flow_rate: f64) -> Self {
        Self {
            demand_flow_rate,
            heavy_vehicle_pct: 0.0,
            peak_hour_factor: 1.0,
        }
    }

    /// Peak 15-minute flow rate `v = V / PHF`.
    pub fn adjusted_demand(&self) -> f64 {
        self.demand_flow_rate / self.peak_hour_factor
    }
}

/// A set of lanes sharing a signal phase and movement.
///
/// Every optional adjustment input that is absent contributes a neutral
/// factor of 1.0 to the saturation flow rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaneGroup {
    pub id: LaneGroupId,
    #[serde(default)]
    pub movement: Movement,
    pub lanes: u32,
    #[serde(default = "default_ideal_saturation_flow")]
    pub ideal_saturation_flow: f64,
    /// Average lane width, feet
    #[serde(default)]
    pub lane_width: Option<f64>,
    /// Approach grade, percent (negative downhill)
    #[serde(default)]
    pub grade: Option<f64>,
    /// Parking maneuvers per hour on an adjacent parking lane
    #[serde(default)]
    pub parking_maneuvers: Option<f64>,
    /// Buses stopping per hour within 250 ft of the stop line
    #[serde(default)]
    pub bus_stops: Option<f64>,
    /// Combined pedestrian/bicycle blockage factor in (0, 1]
    #[serde(default)]
    pub pedestrian_bicycle_factor: Option<f64>,
    #[serde(default)]
    pub area_type: AreaType,
    /// Left turns as percent of a shared lane group's demand
    #[serde(default)]
    pub left_turn_pct: Option<f64>,
    /// Right turns as percent of a shared lane group's demand
    #[serde(default)]
    pub right_turn_pct: Option<f64>,
    #[serde(default)]
    pub progression_factor: Option<f64>,
    /// Upstream filtering/metering adjustment `I`
    #[serde(default)]
    pub upstream_filtering: Option<f64>,
    /// Overrides the approach phase (e.g. a protected left)
    #[serde(default)]
    pub phase: Option<PhaseId>,
    pub volume: Volume,
}

impl LaneGroup {
    pub fn new(id: impl Into<LaneGroupId>, lanes: u32, volume: Volume) -> Self {
        Self {
            id: id.into(),
            movement: Movement::default(),
            lanes,
            ideal_saturation_flow: DEFAULT_IDEAL_SATURATION_FLOW,
            lane_width: None,
            grade: None,
            parking_maneuvers: None,
            bus_stops: None,
            pedestrian_bicycle_factor: None,
            area_type: AreaType::default(),
            left_turn_pct: None,
            right_turn_pct: None,
            progression_factor: None,
            upstream_filtering: None,
            phase: None,
            volume,
        }
    }

    pub fn with_movement(mut self, movement: Movement) -> Self {
        self.movement = movement;
        self
    }

    pub fn with_phase(mut self, phase: impl Into<PhaseId>) -> Self {
        self.phase = Some(phase.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Approach {
    pub id: ApproachId,
    pub direction: Direction,
    /// Phase serving this approach's lane groups unless a lane group overrides it
    pub phase: PhaseId,
    pub lane_groups: Vec<LaneGroup>,
}

impl Approach {
    pub fn lane_group(&self, id: &LaneGroupId) -> Option<&LaneGroup> {
        self.lane_groups.iter().find(|group| &group.id == id)
    }

    pub fn lane_group_mut(&mut self, id: &LaneGroupId) -> Option<&mut LaneGroup> {
        self.lane_groups.iter_mut().find(|group| &group.id == id)
    }

    /// Phase serving `lane_group`.
    pub fn phase_for<'a>(&'a self, lane_group: &'a LaneGroup) -> &'a PhaseId {
        lane_group.phase.as_ref().unwrap_or(&self.phase)
    }
}

/// Signalized intersection. Owns its approaches and timing plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    pub id: NodeId,
    /// Location as (longitude, latitude)
    pub position: Point<f64>,
    #[serde(default = "default_analysis_period")]
    pub analysis_period_hours: f64,
    pub timing: TimingPlan,
    pub approaches: Vec<Approach>,
}

impl Node {
    pub fn approach(&self, id: &ApproachId) -> Option<&Approach> {
        self.approaches.iter().find(|approach| &approach.id == id)
    }

    pub fn approach_mut(&mut self, id: &ApproachId) -> Option<&mut Approach> {
        self.approaches.iter_mut().find(|approach| &approach.id == id)
    }

    pub fn lane_group_count(&self) -> usize {
        self.approaches
            .iter()
            .map(|approach| approach.lane_groups.len())
            .sum()
    }
}

fn default_peak_hour_factor() -> f64 {
    1.0
}

fn default_ideal_saturation_flow() -> f64 {
    DEFAULT_IDEAL_SATURATION_FLOW
}

fn default_analysis_period() -> f64 {
    DEFAULT_ANALYSIS_PERIOD
}
