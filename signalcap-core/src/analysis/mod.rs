//! HCM signalized intersection calculators: saturation flow, capacity,
//! delay, critical v/c and Level of Service.
//!
//! All functions here are pure and assume validated input.

pub mod capacity;
pub mod critical;
pub mod delay;
pub mod los;
pub mod saturation;

pub use capacity::{CapacityResult, check_timing, compute_capacity};
pub use critical::critical_vc;
pub use delay::{DelayRegime, DelayResult, compute_delay, incremental_delay, uniform_delay};
pub use los::{AggregateDelay, LOS_THRESHOLDS, Los, aggregate, classify};
pub use saturation::{AdjustmentFactors, SaturationFlow, saturation_flow};
