//! Control delay per lane group: `d = d1 · PF + d2`.
//!
//! `d1` is the uniform delay evaluated with v/c clipped to 1.0, so it stays
//! bounded under oversaturation. `d2` is the incremental (random plus
//! overflow) delay evaluated with the unclipped v/c; it is the term that
//! grows without bound once demand exceeds capacity. Initial queue delay
//! (`d3`) needs multi-period analysis and is not modelled.

use serde::{Deserialize, Serialize};

use crate::resolve::{PhaseTiming, ResolvedLaneGroup};
use crate::Error;

/// Analytical branch the delay terms were evaluated on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayRegime {
    /// v/c ≤ 1
    Undersaturated,
    /// v/c > 1; uniform delay held at its v/c = 1 ceiling
    Oversaturated,
}

impl DelayRegime {
    pub fn from_vc(vc_ratio: f64) -> Self {
        if vc_ratio > 1.0 {
            DelayRegime::Oversaturated
        } else {
            DelayRegime::Undersaturated
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DelayResult {
    /// Peak 15-minute demand `V / PHF`, veh/h
    pub adjusted_demand: f64,
    pub vc_ratio: f64,
    /// s/veh
    pub uniform_delay: f64,
    /// s/veh
    pub incremental_delay: f64,
    pub progression_factor: f64,
    /// s/veh
    pub control_delay: f64,
    pub regime: DelayRegime,
}

/// `d1 = 0.5·C·(1 − g/C)² / (1 − min(1, X)·g/C)`.
///
/// A phase that is green for the whole cycle has no uniform delay.
pub fn uniform_delay(cycle_length: f64, green_ratio: f64, vc_ratio: f64) -> f64 {
    if green_ratio >= 1.0 {
        return 0.0;
    }
    let red_share = 1.0 - green_ratio;
    0.5 * cycle_length * red_share * red_share / (1.0 - vc_ratio.min(1.0) * green_ratio)
}

/// `d2 = 900·T·[(X − 1) + √((X − 1)² + 8kIX / (cT))]`.
///
/// Below capacity the bracket is evaluated as `e / (√((X − 1)² + e) − (X − 1))`,
/// which is the same quantity without the cancellation between its two terms.
pub fn incremental_delay(
    vc_ratio: f64,
    capacity: f64,
    analysis_period_hours: f64,
    calibration: f64,
    upstream_filtering: f64,
) -> f64 {
    let term = 8.0 * calibration * upstream_filtering * vc_ratio / (capacity * analysis_period_hours);
    let excess = vc_ratio - 1.0;
    let root = excess.hypot(term.sqrt());
    let bracket = if excess < 0.0 {
        term / (root - excess)
    } else {
        excess + root
    };
    900.0 * analysis_period_hours * bracket
}

/// Computes v/c and the delay terms for a lane group.
///
/// `demand_flow_rate` is the hourly demand; it is adjusted by the lane
/// group's peak-hour factor before use.
///
/// # Errors
///
/// Returns [`Error::InvalidCapacity`] when `capacity` is not positive.
pub fn compute_delay(
    lane_group: &ResolvedLaneGroup,
    phase: &PhaseTiming,
    capacity: f64,
    demand_flow_rate: f64,
) -> Result<DelayResult, Error> {
    if capacity.is_nan() || capacity <= 0.0 {
        return Err(Error::InvalidCapacity { capacity });
    }

    let adjusted_demand = demand_flow_rate / lane_group.volume.peak_hour_factor;
    let vc_ratio = adjusted_demand / capacity;

    let uniform = uniform_delay(phase.cycle_length, phase.green_ratio(), vc_ratio);
    let incremental = incremental_delay(
        vc_ratio,
        capacity,
        lane_group.analysis_period_hours,
        phase.control_type.incremental_delay_calibration(),
        lane_group.upstream_filtering,
    );
    let progression_factor = lane_group.progression_factor;

    Ok(DelayResult {
        adjusted_demand,
        vc_ratio,
        uniform_delay: uniform,
        incremental_delay: incremental,
        progression_factor,
        control_delay: uniform * progression_factor + incremental,
        regime: DelayRegime::from_vc(vc_ratio),
    })
}
