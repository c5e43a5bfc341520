//! Input model of a signalized intersection
//!
//! Snapshots are owned, acyclic trees: a node owns its timing plan and
//! approaches, approaches own lane groups, lane groups own their volume.

pub mod ids;
pub mod intersection;
pub mod path;
pub mod snapshot;
pub mod timing;

pub use ids::{ApproachId, LaneGroupId, NodeId, PhaseId, ScenarioId};
pub use intersection::{
    Approach, AreaType, DEFAULT_ANALYSIS_PERIOD, DEFAULT_IDEAL_SATURATION_FLOW, Direction,
    LaneGroup, Movement, Node, Volume,
};
pub use path::{EntityPath, Field, FieldPath};
pub use snapshot::{MAX_APPROACHES, MAX_LANES, Snapshot};
pub use timing::{ControlType, DEFAULT_LOST_TIME, SignalPhase, TimingPlan};
