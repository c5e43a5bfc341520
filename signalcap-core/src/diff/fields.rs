//! Field tables: which fields each entity carries, how to read them as
//! [`FieldValue`]s and how to write them back.

use super::FieldValue;
use crate::model::{Approach, Field, FieldPath, LaneGroup, Node, SignalPhase};
use crate::Error;

pub(super) const NODE_FIELDS: [Field; 3] =
    [Field::Position, Field::AnalysisPeriod, Field::CycleLength];

pub(super) const PHASE_FIELDS: [Field; 3] =
    [Field::EffectiveGreen, Field::LostTime, Field::ControlType];

pub(super) const APPROACH_FIELDS: [Field; 2] = [Field::Direction, Field::ApproachPhase];

pub(super) const LANE_GROUP_FIELDS: [Field; 17] = [
    Field::Movement,
    Field::Lanes,
    Field::IdealSaturationFlow,
    Field::LaneWidth,
    Field::Grade,
    Field::ParkingManeuvers,
    Field::BusStops,
    Field::PedestrianBicycleFactor,
    Field::AreaType,
    Field::LeftTurnPct,
    Field::RightTurnPct,
    Field::ProgressionFactor,
    Field::UpstreamFiltering,
    Field::LaneGroupPhase,
    Field::DemandFlowRate,
    Field::HeavyVehiclePct,
    Field::PeakHourFactor,
];

fn number(value: f64) -> Option<FieldValue> {
    Some(FieldValue::Number(value))
}

fn optional(value: Option<f64>) -> Option<FieldValue> {
    value.map(FieldValue::Number)
}

pub(super) fn node_field(node: &Node, field: Field) -> Option<FieldValue> {
    match field {
        Field::Position => Some(FieldValue::Position(node.position)),
        Field::AnalysisPeriod => number(node.analysis_period_hours),
        Field::CycleLength => number(node.timing.cycle_length),
        _ => None,
    }
}

pub(super) fn phase_field(phase: &SignalPhase, field: Field) -> Option<FieldValue> {
    match field {
        Field::EffectiveGreen => number(phase.effective_green),
        Field::LostTime => number(phase.lost_time),
        Field::ControlType => Some(FieldValue::ControlType(phase.control_type)),
        _ => None,
    }
}

pub(super) fn approach_field(approach: &Approach, field: Field) -> Option<FieldValue> {
    match field {
        Field::Direction => Some(FieldValue::Direction(approach.direction)),
        Field::ApproachPhase => Some(FieldValue::Phase(approach.phase.clone())),
        _ => None,
    }
}

pub(super) fn lane_group_field(group: &LaneGroup, field: Field) -> Option<FieldValue> {
    match field {
        Field::Movement => Some(FieldValue::Movement(group.movement)),
        Field::Lanes => Some(FieldValue::Count(group.lanes)),
        Field::IdealSaturationFlow => number(group.ideal_saturation_flow),
        Field::LaneWidth => optional(group.lane_width),
        Field::Grade => optional(group.grade),
        Field::ParkingManeuvers => optional(group.parking_maneuvers),
        Field::BusStops => optional(group.bus_stops),
        Field::PedestrianBicycleFactor => optional(group.pedestrian_bicycle_factor),
        Field::AreaType => Some(FieldValue::AreaType(group.area_type)),
        Field::LeftTurnPct => optional(group.left_turn_pct),
        Field::RightTurnPct => optional(group.right_turn_pct),
        Field::ProgressionFactor => optional(group.progression_factor),
        Field::UpstreamFiltering => optional(group.upstream_filtering),
        Field::LaneGroupPhase => group.phase.clone().map(FieldValue::Phase),
        Field::DemandFlowRate => number(group.volume.demand_flow_rate),
        Field::HeavyVehiclePct => number(group.volume.heavy_vehicle_pct),
        Field::PeakHourFactor => number(group.volume.peak_hour_factor),
        _ => None,
    }
}

/// Typed extraction of a record's new value for one field.
struct Target<'a> {
    path: &'a FieldPath,
    value: Option<FieldValue>,
}

impl Target<'_> {
    fn mismatch(&self) -> Error {
        Error::conflict(
            self.path,
            format!("value {:?} does not fit this field", self.value),
        )
    }

    fn optional_number(self) -> Result<Option<f64>, Error> {
        match self.value {
            None => Ok(None),
            Some(FieldValue::Number(value)) => Ok(Some(value)),
            Some(_) => Err(self.mismatch()),
        }
    }

    fn number(self) -> Result<f64, Error> {
        match self.value {
            Some(FieldValue::Number(value)) => Ok(value),
            _ => Err(self.mismatch()),
        }
    }

    fn required(self) -> Result<FieldValue, Error> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(Error::conflict(self.path, "a required field cannot be removed")),
        }
    }
}

fn foreign(path: &FieldPath) -> Error {
    Error::conflict(path, "field does not belong to this entity")
}

pub(super) fn set_node_field(
    node: &mut Node,
    path: &FieldPath,
    field: Field,
    value: Option<FieldValue>,
) -> Result<(), Error> {
    let target = Target { path, value };
    match field {
        Field::Position => match target.required()? {
            FieldValue::Position(position) => node.position = position,
            other => return Err(mismatch(path, other)),
        },
        Field::AnalysisPeriod => node.analysis_period_hours = target.number()?,
        Field::CycleLength => node.timing.cycle_length = target.number()?,
        _ => return Err(foreign(path)),
    }
    Ok(())
}

pub(super) fn set_phase_field(
    phase: &mut SignalPhase,
    path: &FieldPath,
    field: Field,
    value: Option<FieldValue>,
) -> Result<(), Error> {
    let target = Target { path, value };
    match field {
        Field::EffectiveGreen => phase.effective_green = target.number()?,
        Field::LostTime => phase.lost_time = target.number()?,
        Field::ControlType => match target.required()? {
            FieldValue::ControlType(control_type) => phase.control_type = control_type,
            other => return Err(mismatch(path, other)),
        },
        _ => return Err(foreign(path)),
    }
    Ok(())
}

pub(super) fn set_approach_field(
    approach: &mut Approach,
    path: &FieldPath,
    field: Field,
    value: Option<FieldValue>,
) -> Result<(), Error> {
    let target = Target { path, value };
    match (field, target.required()?) {
        (Field::Direction, FieldValue::Direction(direction)) => approach.direction = direction,
        (Field::ApproachPhase, FieldValue::Phase(phase)) => approach.phase = phase,
        (Field::Direction | Field::ApproachPhase, other) => return Err(mismatch(path, other)),
        _ => return Err(foreign(path)),
    }
    Ok(())
}

pub(super) fn set_lane_group_field(
    group: &mut LaneGroup,
    path: &FieldPath,
    field: Field,
    value: Option<FieldValue>,
) -> Result<(), Error> {
    let target = Target { path, value };
    match field {
        Field::Movement => match target.required()? {
            FieldValue::Movement(movement) => group.movement = movement,
            other => return Err(mismatch(path, other)),
        },
        Field::Lanes => match target.required()? {
            FieldValue::Count(lanes) => group.lanes = lanes,
            other => return Err(mismatch(path, other)),
        },
        Field::AreaType => match target.required()? {
            FieldValue::AreaType(area_type) => group.area_type = area_type,
            other => return Err(mismatch(path, other)),
        },
        Field::LaneGroupPhase => match target.value {
            None => group.phase = None,
            Some(FieldValue::Phase(phase)) => group.phase = Some(phase),
            Some(other) => return Err(mismatch(path, other)),
        },
        Field::IdealSaturationFlow => group.ideal_saturation_flow = target.number()?,
        Field::LaneWidth => group.lane_width = target.optional_number()?,
        Field::Grade => group.grade = target.optional_number()?,
        Field::ParkingManeuvers => group.parking_maneuvers = target.optional_number()?,
        Field::BusStops => group.bus_stops = target.optional_number()?,
        Field::PedestrianBicycleFactor => {
            group.pedestrian_bicycle_factor = target.optional_number()?;
        }
        Field::LeftTurnPct => group.left_turn_pct = target.optional_number()?,
        Field::RightTurnPct => group.right_turn_pct = target.optional_number()?,
        Field::ProgressionFactor => group.progression_factor = target.optional_number()?,
        Field::UpstreamFiltering => group.upstream_filtering = target.optional_number()?,
        Field::DemandFlowRate => group.volume.demand_flow_rate = target.number()?,
        Field::HeavyVehiclePct => group.volume.heavy_vehicle_pct = target.number()?,
        Field::PeakHourFactor => group.volume.peak_hour_factor = target.number()?,
        _ => return Err(foreign(path)),
    }
    Ok(())
}

fn mismatch(path: &FieldPath, value: FieldValue) -> Error {
    Target {
        path,
        value: Some(value),
    }
    .mismatch()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EntityPath, Volume};

    #[test]
    fn every_lane_group_field_round_trips() {
        let mut group = LaneGroup::new("NB-T", 2, Volume::new(400.0));
        group.grade = Some(2.0);
        group.phase = Some("6".into());
        let mut copy = LaneGroup::new("NB-T", 1, Volume::new(0.0));
        let entity = EntityPath::lane_group(&"NB".into(), &"NB-T".into());

        for field in LANE_GROUP_FIELDS {
            let path = entity.clone().field(field);
            set_lane_group_field(&mut copy, &path, field, lane_group_field(&group, field)).unwrap();
        }
        assert_eq!(copy, group);
    }

    #[test]
    fn rejects_values_of_the_wrong_type() {
        let mut node = crate::test_fixtures::single_lane_group(400.0).node;
        let path = EntityPath::Node.field(Field::CycleLength);
        let err = set_node_field(&mut node, &path, Field::CycleLength, Some(FieldValue::Count(90)))
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::PatchConflict);
    }

    #[test]
    fn rejects_removing_required_fields() {
        let mut group = LaneGroup::new("NB-T", 2, Volume::new(400.0));
        let path = EntityPath::lane_group(&"NB".into(), &"NB-T".into()).field(Field::Lanes);
        assert!(set_lane_group_field(&mut group, &path, Field::Lanes, None).is_err());
    }
}
