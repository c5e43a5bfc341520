pub use crate::{Error, ErrorKind, TimingFault};

// Input model
pub use crate::model::{
    Approach, ApproachId, AreaType, ControlType, Direction, EntityPath, Field, FieldPath,
    LaneGroup, LaneGroupId, Movement, Node, NodeId, PhaseId, ScenarioId, SignalPhase, Snapshot,
    TimingPlan, Volume,
};

// Orchestrator
pub use crate::config::{ENGINE_VERSION, EngineConfig, EngineVersion};
pub use crate::engine::{
    ApproachResult, InputHash, LaneGroupResult, NodeResult, run, run_with_config,
};

// Calculators
pub use crate::analysis::{DelayRegime, Los, classify};

// Diffing and editing
pub use crate::diff::{
    ChangeKind, ChangeRecord, DiffResult, FieldValue, ResultComparison, SnapshotRef, apply_diff,
    compare_results, diff,
};
pub use crate::scenario::{ChangeSet, DemandAdjustment, EditOutcome, ScenarioEdit, apply_edits};
