//! Versioned scenario snapshots and their structural validation

use std::ops::RangeInclusive;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::path::{EntityPath, Field, FieldPath};
use super::{Approach, LaneGroup, Node, ScenarioId};
use crate::Error;

/// Approaches a standard signalized intersection may have
pub const MAX_APPROACHES: usize = 4;
/// Lanes a single lane group may have
pub const MAX_LANES: u32 = 8;

/// A complete intersection description at one scenario version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub scenario_id: ScenarioId,
    pub version: u32,
    pub node: Node,
}

impl Snapshot {
    pub fn new(scenario_id: impl Into<ScenarioId>, version: u32, node: Node) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            version,
            node,
        }
    }

    /// Copy with phases, approaches and lane groups ordered by identifier.
    #[must_use]
    pub fn canonical(&self) -> Self {
        let mut snapshot = self.clone();
        snapshot.node.timing.phases.sort_by(|a, b| a.id.cmp(&b.id));
        snapshot.node.approaches.sort_by(|a, b| a.id.cmp(&b.id));
        for approach in &mut snapshot.node.approaches {
            approach.lane_groups.sort_by(|a, b| a.id.cmp(&b.id));
        }
        snapshot
    }

    /// Equality up to entity ordering.
    pub fn equivalent(&self, other: &Snapshot) -> bool {
        self.canonical() == other.canonical()
    }

    /// Rejects structurally invalid or out-of-range input.
    ///
    /// Signal timing ranges (cycle, green, lost time) are left to the
    /// capacity calculator, which reports them as timing errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] addressing the first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        let node = &self.node;

        let count = node.approaches.len();
        if count == 0 || count > MAX_APPROACHES {
            return Err(Error::invalid_input(
                "/approaches",
                format!("expected 1 to {MAX_APPROACHES} approaches, got {count}"),
            ));
        }

        let position = node.position;
        if !position.x().is_finite() || !position.y().is_finite() {
            return Err(Error::invalid_input(
                EntityPath::Node.field(Field::Position).to_string(),
                "coordinates must be finite",
            ));
        }
        check_open_closed(
            node.analysis_period_hours,
            1.0,
            EntityPath::Node.field(Field::AnalysisPeriod),
        )?;
        check_finite(
            node.timing.cycle_length,
            EntityPath::Node.field(Field::CycleLength),
        )?;

        if let Some(id) = node.timing.phases.iter().map(|p| &p.id).duplicates().next() {
            return Err(Error::invalid_input(
                EntityPath::phase(id).whole().to_string(),
                "duplicate phase id",
            ));
        }
        for phase in &node.timing.phases {
            let entity = EntityPath::phase(&phase.id);
            check_finite(phase.effective_green, entity.clone().field(Field::EffectiveGreen))?;
            check_finite(phase.lost_time, entity.field(Field::LostTime))?;
        }

        if let Some(id) = node.approaches.iter().map(|a| &a.id).duplicates().next() {
            return Err(Error::invalid_input(
                EntityPath::approach(id).whole().to_string(),
                "duplicate approach id",
            ));
        }
        if let Some(direction) = node.approaches.iter().map(|a| a.direction).duplicates().next() {
            return Err(Error::invalid_input(
                "/approaches",
                format!("more than one {direction} approach"),
            ));
        }

        for approach in &node.approaches {
            self.validate_approach(approach)?;
        }
        Ok(())
    }

    fn validate_approach(&self, approach: &Approach) -> Result<(), Error> {
        let entity = EntityPath::approach(&approach.id);
        if self.node.timing.phase(&approach.phase).is_none() {
            return Err(Error::invalid_input(
                entity.field(Field::ApproachPhase).to_string(),
                format!("undefined phase {}", approach.phase),
            ));
        }
        if approach.lane_groups.is_empty() {
            return Err(Error::invalid_input(
                format!("{entity}/lane_groups"),
                "approach has no lane groups",
            ));
        }
        if let Some(id) = approach.lane_groups.iter().map(|g| &g.id).duplicates().next() {
            return Err(Error::invalid_input(
                EntityPath::lane_group(&approach.id, id).whole().to_string(),
                "duplicate lane group id",
            ));
        }
        approach
            .lane_groups
            .iter()
            .try_for_each(|group| self.validate_lane_group(approach, group))
    }

    fn validate_lane_group(&self, approach: &Approach, group: &LaneGroup) -> Result<(), Error> {
        let entity = EntityPath::lane_group(&approach.id, &group.id);
        let at = |field: Field| entity.clone().field(field);

        if group.lanes == 0 || group.lanes > MAX_LANES {
            return Err(Error::invalid_input(
                at(Field::Lanes).to_string(),
                format!("expected 1 to {MAX_LANES} lanes, got {}", group.lanes),
            ));
        }
        if !(group.ideal_saturation_flow.is_finite() && group.ideal_saturation_flow > 0.0) {
            return Err(Error::invalid_input(
                at(Field::IdealSaturationFlow).to_string(),
                "ideal saturation flow must be positive",
            ));
        }
        if let Some(width) = group.lane_width {
            if !(width.is_finite() && width > 8.0 && width <= 24.0) {
                return Err(Error::invalid_input(
                    at(Field::LaneWidth).to_string(),
                    format!("lane width {width} ft outside (8, 24]"),
                ));
            }
        }
        check_optional(group.grade, -10.0..=10.0, at(Field::Grade))?;
        check_optional(group.parking_maneuvers, 0.0..=180.0, at(Field::ParkingManeuvers))?;
        check_optional(group.bus_stops, 0.0..=250.0, at(Field::BusStops))?;
        check_optional(group.left_turn_pct, 0.0..=100.0, at(Field::LeftTurnPct))?;
        check_optional(group.right_turn_pct, 0.0..=100.0, at(Field::RightTurnPct))?;
        if let Some(factor) = group.pedestrian_bicycle_factor {
            check_open_closed(factor, 1.0, at(Field::PedestrianBicycleFactor))?;
        }
        if let Some(factor) = group.progression_factor {
            check_open_closed(factor, 2.5, at(Field::ProgressionFactor))?;
        }
        if let Some(factor) = group.upstream_filtering {
            check_open_closed(factor, 1.0, at(Field::UpstreamFiltering))?;
        }
        if let Some(phase) = &group.phase {
            if self.node.timing.phase(phase).is_none() {
                return Err(Error::invalid_input(
                    at(Field::LaneGroupPhase).to_string(),
                    format!("undefined phase {phase}"),
                ));
            }
        }

        let volume = &group.volume;
        if !(volume.demand_flow_rate.is_finite() && volume.demand_flow_rate >= 0.0) {
            return Err(Error::invalid_input(
                at(Field::DemandFlowRate).to_string(),
                format!(
                    "demand flow rate must be non-negative, got {}",
                    volume.demand_flow_rate
                ),
            ));
        }
        check_range(volume.heavy_vehicle_pct, 0.0..=100.0, at(Field::HeavyVehiclePct))?;
        check_open_closed(volume.peak_hour_factor, 1.0, at(Field::PeakHourFactor))
    }
}

fn check_finite(value: f64, path: FieldPath) -> Result<(), Error> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::invalid_input(path.to_string(), "must be a finite number"))
    }
}

fn check_range(value: f64, range: RangeInclusive<f64>, path: FieldPath) -> Result<(), Error> {
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(Error::invalid_input(
            path.to_string(),
            format!("{value} outside [{}, {}]", range.start(), range.end()),
        ))
    }
}

fn check_optional(
    value: Option<f64>,
    range: RangeInclusive<f64>,
    path: FieldPath,
) -> Result<(), Error> {
    value.map_or(Ok(()), |value| check_range(value, range, path))
}

/// Checks `value` lies in `(0, max]`.
fn check_open_closed(value: f64, max: f64, path: FieldPath) -> Result<(), Error> {
    if value.is_finite() && value > 0.0 && value <= max {
        Ok(())
    } else {
        Err(Error::invalid_input(
            path.to_string(),
            format!("{value} outside (0, {max}]"),
        ))
    }
}
