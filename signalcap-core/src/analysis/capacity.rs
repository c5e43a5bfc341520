//! Lane group capacity, `c = s · g / C`.

use serde::{Deserialize, Serialize};

use super::saturation::{SaturationFlow, saturation_flow};
use crate::error::TimingFault;
use crate::resolve::{PhaseTiming, ResolvedLaneGroup};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityResult {
    pub saturation: SaturationFlow,
    /// `g / C`
    pub green_ratio: f64,
    /// veh/h
    pub capacity: f64,
}

/// Checks `C > 0`, `0 ≤ g ≤ C` and `lost time ≥ 0`.
///
/// # Errors
///
/// Returns the first [`TimingFault`] found.
pub fn check_timing(phase: &PhaseTiming) -> Result<(), TimingFault> {
    let cycle = phase.cycle_length;
    let green = phase.effective_green;
    if cycle.is_nan() || cycle <= 0.0 {
        return Err(TimingFault::NonPositiveCycle(cycle));
    }
    if green < 0.0 {
        return Err(TimingFault::NegativeGreen(green));
    }
    if green > cycle {
        return Err(TimingFault::GreenExceedsCycle { green, cycle });
    }
    if phase.lost_time < 0.0 {
        return Err(TimingFault::NegativeLostTime(phase.lost_time));
    }
    Ok(())
}

/// Computes saturation flow rate and capacity for a lane group.
///
/// Zero green yields zero capacity; rejecting it is left to the delay step.
///
/// # Errors
///
/// Returns [`Error::InvalidTiming`] for a malformed phase.
pub fn compute_capacity(
    lane_group: &ResolvedLaneGroup,
    phase: &PhaseTiming,
) -> Result<CapacityResult, Error> {
    check_timing(phase)?;

    let saturation = saturation_flow(
        lane_group.ideal_saturation_flow,
        lane_group.lanes,
        lane_group.factors,
    );
    let green_ratio = phase.green_ratio();

    Ok(CapacityResult {
        saturation,
        green_ratio,
        capacity: saturation.total * green_ratio,
    })
}
