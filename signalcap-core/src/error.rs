use thiserror::Error;

use crate::model::{ApproachId, LaneGroupId};

/// Reasons a signal timing plan is rejected by the capacity calculator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimingFault {
    #[error("cycle length must be positive, got {0} s")]
    NonPositiveCycle(f64),
    #[error("effective green cannot be negative, got {0} s")]
    NegativeGreen(f64),
    #[error("effective green {green} s exceeds cycle length {cycle} s")]
    GreenExceedsCycle { green: f64, cycle: f64 },
    #[error("lost time cannot be negative, got {0} s")]
    NegativeLostTime(f64),
    #[error("total lost time {lost} s leaves no usable green in a {cycle} s cycle")]
    LostTimeExceedsCycle { lost: f64, cycle: f64 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid signal timing: {0}")]
    InvalidTiming(#[from] TimingFault),
    #[error("Invalid capacity {capacity} veh/h: delay requires a positive capacity")]
    InvalidCapacity { capacity: f64 },
    #[error("Invalid input at {path}: {reason}")]
    InvalidInput { path: String, reason: String },
    #[error("Snapshots cannot be compared: {reason}")]
    DiffIdentityMismatch { reason: String },
    #[error("Patch conflict at {path}: {reason}")]
    PatchConflict { path: String, reason: String },
    #[error("Lane group {lane_group} on approach {approach} failed: {source}")]
    LaneGroup {
        approach: ApproachId,
        lane_group: LaneGroupId,
        #[source]
        source: Box<Error>,
    },
}

/// Flat classification of [`Error`], looking through the lane group wrapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidTiming,
    InvalidCapacity,
    InvalidInput,
    DiffIdentityMismatch,
    PatchConflict,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidTiming(_) => ErrorKind::InvalidTiming,
            Error::InvalidCapacity { .. } => ErrorKind::InvalidCapacity,
            Error::InvalidInput { .. } => ErrorKind::InvalidInput,
            Error::DiffIdentityMismatch { .. } => ErrorKind::DiffIdentityMismatch,
            Error::PatchConflict { .. } => ErrorKind::PatchConflict,
            Error::LaneGroup { source, .. } => source.kind(),
        }
    }

    pub(crate) fn invalid_input(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn conflict(path: impl ToString, reason: impl Into<String>) -> Self {
        Error::PatchConflict {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
