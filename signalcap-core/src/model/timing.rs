//! Signal timing plan: cycle length and the phases sharing it

use serde::{Deserialize, Serialize};

use super::PhaseId;

/// Lost time assumed for a phase when none is given (start-up plus clearance), seconds
pub const DEFAULT_LOST_TIME: f64 = 4.0;

/// Controller type, selects the incremental delay calibration factor `k`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlType {
    #[default]
    Pretimed,
    ActuatedUncoordinated,
    ActuatedCoordinated,
}

impl ControlType {
    /// Incremental delay calibration factor `k`.
    pub fn incremental_delay_calibration(self) -> f64 {
        match self {
            ControlType::Pretimed | ControlType::ActuatedUncoordinated => 0.50,
            ControlType::ActuatedCoordinated => 0.45,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignalPhase {
    pub id: PhaseId,
    /// Effective green time in seconds
    pub effective_green: f64,
    /// Lost time in seconds
    #[serde(default = "default_lost_time")]
    pub lost_time: f64,
    #[serde(default)]
    pub control_type: ControlType,
}

impl SignalPhase {
    pub fn new(id: impl Into<PhaseId>, effective_green: f64) -> Self {
        Self {
            id: id.into(),
            effective_green,
            lost_time: DEFAULT_LOST_TIME,
            control_type: ControlType::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimingPlan {
    /// Cycle length in seconds
    pub cycle_length: f64,
    pub phases: Vec<SignalPhase>,
}

impl TimingPlan {
    pub fn phase(&self, id: &PhaseId) -> Option<&SignalPhase> {
        self.phases.iter().find(|phase| &phase.id == id)
    }

    pub fn phase_mut(&mut self, id: &PhaseId) -> Option<&mut SignalPhase> {
        self.phases.iter_mut().find(|phase| &phase.id == id)
    }

    pub fn total_lost_time(&self) -> f64 {
        self.phases.iter().map(|phase| phase.lost_time).sum()
    }
}

fn default_lost_time() -> f64 {
    DEFAULT_LOST_TIME
}
