//! Saturation flow rate and its adjustment factors.
//!
//! `s = s0 · N · fw · fHV · fg · fp · fbb · fa · fLT · fRT · fpb`
//!
//! Every factor whose input is absent is exactly 1.0; nothing is estimated.

use serde::{Deserialize, Serialize};

use crate::model::{AreaType, LaneGroup, Movement};

/// Passenger car equivalent of one heavy vehicle
pub const HEAVY_VEHICLE_EQUIVALENT: f64 = 2.0;
/// Lower bound for the parking and bus blockage factors
pub const MIN_BLOCKAGE_FACTOR: f64 = 0.05;

/// Bounds on the lane width factor
pub const LANE_WIDTH_FACTOR_RANGE: (f64, f64) = (0.87, 1.07);

const EXCLUSIVE_LEFT_FACTOR: f64 = 0.95;
const EXCLUSIVE_RIGHT_FACTOR: f64 = 0.85;
const CBD_FACTOR: f64 = 0.90;

/// Multiplicative adjustments applied to the ideal saturation flow rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentFactors {
    pub lane_width: f64,
    pub heavy_vehicle: f64,
    pub grade: f64,
    pub parking: f64,
    pub bus_blockage: f64,
    pub area_type: f64,
    pub left_turn: f64,
    pub right_turn: f64,
    pub pedestrian_bicycle: f64,
}

impl AdjustmentFactors {
    pub const NEUTRAL: Self = Self {
        lane_width: 1.0,
        heavy_vehicle: 1.0,
        grade: 1.0,
        parking: 1.0,
        bus_blockage: 1.0,
        area_type: 1.0,
        left_turn: 1.0,
        right_turn: 1.0,
        pedestrian_bicycle: 1.0,
    };

    pub fn for_lane_group(group: &LaneGroup) -> Self {
        Self {
            lane_width: group.lane_width.map_or(1.0, lane_width_factor),
            heavy_vehicle: heavy_vehicle_factor(group.volume.heavy_vehicle_pct),
            grade: group.grade.map_or(1.0, grade_factor),
            parking: group
                .parking_maneuvers
                .map_or(1.0, |maneuvers| parking_factor(group.lanes, maneuvers)),
            bus_blockage: group
                .bus_stops
                .map_or(1.0, |buses| bus_blockage_factor(group.lanes, buses)),
            area_type: area_type_factor(group.area_type),
            left_turn: left_turn_factor(group.movement, group.left_turn_pct),
            right_turn: right_turn_factor(group.movement, group.right_turn_pct),
            pedestrian_bicycle: group.pedestrian_bicycle_factor.unwrap_or(1.0),
        }
    }

    pub fn product(&self) -> f64 {
        self.lane_width
            * self.heavy_vehicle
            * self.grade
            * self.parking
            * self.bus_blockage
            * self.area_type
            * self.left_turn
            * self.right_turn
            * self.pedestrian_bicycle
    }
}

impl Default for AdjustmentFactors {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// `fw = 1 + (W − 12) / 30`, W in feet, bounded to [`LANE_WIDTH_FACTOR_RANGE`].
pub fn lane_width_factor(width: f64) -> f64 {
    let (low, high) = LANE_WIDTH_FACTOR_RANGE;
    (1.0 + (width - 12.0) / 30.0).clamp(low, high)
}

/// `fHV = 100 / (100 + %HV · (ET − 1))`.
pub fn heavy_vehicle_factor(heavy_vehicle_pct: f64) -> f64 {
    100.0 / (100.0 + heavy_vehicle_pct * (HEAVY_VEHICLE_EQUIVALENT - 1.0))
}

/// `fg = 1 − %G / 200`.
pub fn grade_factor(grade_pct: f64) -> f64 {
    1.0 - grade_pct / 200.0
}

/// `fp = (N − 0.1 − 18·Nm/3600) / N`, not below [`MIN_BLOCKAGE_FACTOR`].
///
/// Parking with no maneuvers has no effect.
pub fn parking_factor(lanes: u32, maneuvers_per_hour: f64) -> f64 {
    if maneuvers_per_hour == 0.0 {
        return 1.0;
    }
    let n = f64::from(lanes);
    ((n - 0.1 - 18.0 * maneuvers_per_hour / 3600.0) / n).max(MIN_BLOCKAGE_FACTOR)
}

/// `fbb = (N − 14.4·NB/3600) / N`, not below [`MIN_BLOCKAGE_FACTOR`].
pub fn bus_blockage_factor(lanes: u32, buses_per_hour: f64) -> f64 {
    let n = f64::from(lanes);
    ((n - 14.4 * buses_per_hour / 3600.0) / n).max(MIN_BLOCKAGE_FACTOR)
}

pub fn area_type_factor(area_type: AreaType) -> f64 {
    match area_type {
        AreaType::Cbd => CBD_FACTOR,
        AreaType::Other => 1.0,
    }
}

/// Exclusive protected left lanes take 0.95; shared groups `1 / (1 + 0.05·PLT)`.
pub fn left_turn_factor(movement: Movement, left_turn_pct: Option<f64>) -> f64 {
    match movement {
        Movement::Left => EXCLUSIVE_LEFT_FACTOR,
        m if m.shares_left() => 1.0 / (1.0 + 0.05 * left_turn_pct.unwrap_or(0.0) / 100.0),
        _ => 1.0,
    }
}

/// Exclusive right lanes take 0.85; shared groups `1 − 0.15·PRT`.
pub fn right_turn_factor(movement: Movement, right_turn_pct: Option<f64>) -> f64 {
    match movement {
        Movement::Right => EXCLUSIVE_RIGHT_FACTOR,
        m if m.shares_right() => {
            (1.0 - 0.15 * right_turn_pct.unwrap_or(0.0) / 100.0).max(MIN_BLOCKAGE_FACTOR)
        }
        _ => 1.0,
    }
}

/// Saturation flow rate breakdown for a lane group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SaturationFlow {
    /// Ideal rate, pc/h/ln
    pub ideal: f64,
    pub lanes: u32,
    pub factors: AdjustmentFactors,
    /// Adjusted rate per lane, veh/h/ln
    pub per_lane: f64,
    /// Adjusted rate for the whole lane group, veh/h
    pub total: f64,
}

pub fn saturation_flow(ideal: f64, lanes: u32, factors: AdjustmentFactors) -> SaturationFlow {
    let per_lane = ideal * factors.product();
    SaturationFlow {
        ideal,
        lanes,
        factors,
        per_lane,
        total: per_lane * f64::from(lanes),
    }
}
