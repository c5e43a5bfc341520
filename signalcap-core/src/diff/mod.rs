//! Scenario diff engine.
//!
//! Snapshots are compared entity by entity, matched on identifiers rather
//! than positions. Every differing field becomes one [`ChangeRecord`]; an
//! entity present on only one side becomes a single whole-entity record
//! carrying its full definition. Records are ordered by path.

mod fields;
mod patch;
mod results;
mod snapshot_diff;

pub use patch::apply_diff;
pub use results::{
    ApproachComparison, Delta, LaneGroupComparison, ResultComparison, compare_results,
};
pub use snapshot_diff::diff;

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::model::{
    Approach, AreaType, ControlType, Direction, FieldPath, LaneGroup, Movement, NodeId, PhaseId,
    ScenarioId, SignalPhase, Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    #[must_use]
    pub fn inverse(self) -> Self {
        match self {
            ChangeKind::Added => ChangeKind::Removed,
            ChangeKind::Removed => ChangeKind::Added,
            ChangeKind::Modified => ChangeKind::Modified,
        }
    }
}

/// Value of an addressed field, or a whole entity for entity-level records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Number(f64),
    Count(u32),
    Position(Point<f64>),
    Direction(Direction),
    Movement(Movement),
    AreaType(AreaType),
    ControlType(ControlType),
    Phase(PhaseId),
    PhaseDefinition(SignalPhase),
    Approach(Box<Approach>),
    LaneGroup(Box<LaneGroup>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub path: FieldPath,
    pub kind: ChangeKind,
    /// `None` for added values
    pub old: Option<FieldValue>,
    /// `None` for removed values
    pub new: Option<FieldValue>,
}

impl ChangeRecord {
    pub(crate) fn between(path: FieldPath, old: Option<FieldValue>, new: Option<FieldValue>) -> Self {
        let kind = match (&old, &new) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        };
        Self {
            path,
            kind,
            old,
            new,
        }
    }

    /// JSON-pointer style rendering of [`ChangeRecord::path`]
    pub fn pointer(&self) -> String {
        self.path.to_string()
    }

    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            path: self.path.clone(),
            kind: self.kind.inverse(),
            old: self.new.clone(),
            new: self.old.clone(),
        }
    }
}

/// Identity and version of a compared snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SnapshotRef {
    pub scenario_id: ScenarioId,
    pub version: u32,
}

impl SnapshotRef {
    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            scenario_id: snapshot.scenario_id.clone(),
            version: snapshot.version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Node both snapshots describe
    pub node: NodeId,
    pub from: SnapshotRef,
    pub to: SnapshotRef,
    pub changes: Vec<ChangeRecord>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn change(&self, path: &FieldPath) -> Option<&ChangeRecord> {
        self.changes
            .binary_search_by(|record| record.path.cmp(path))
            .ok()
            .map(|index| &self.changes[index])
    }

    /// The diff in the opposite direction, equal to `diff(to, from)`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        Self {
            node: self.node.clone(),
            from: self.to.clone(),
            to: self.from.clone(),
            changes: self.changes.iter().map(ChangeRecord::inverse).collect(),
        }
    }
}
