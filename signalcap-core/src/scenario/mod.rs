//! Named change sets of typed edits applied atomically to a snapshot.
//!
//! Each successful application yields the next version of the scenario and
//! the diff from the base version, which serves as its audit record.

mod edits;

pub use edits::{DemandAdjustment, ScenarioEdit};

use log::info;
use serde::{Deserialize, Serialize};

use crate::analysis::check_timing;
use crate::diff::{DiffResult, diff};
use crate::model::Snapshot;
use crate::resolve::PhaseTiming;
use crate::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangeSet {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub edits: Vec<ScenarioEdit>,
}

impl ChangeSet {
    pub fn new(name: impl Into<String>, edits: Vec<ScenarioEdit>) -> Self {
        Self {
            name: name.into(),
            description: None,
            edits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditOutcome {
    /// Edited snapshot, one version after the base
    pub snapshot: Snapshot,
    /// Changes from the base snapshot to `snapshot`
    pub diff: DiffResult,
}

/// Applies every edit of `change_set` to a copy of `base`.
///
/// Either every edit applies and the result validates, or no snapshot is
/// produced. `base` itself is never modified.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] with a path starting `/edits/{index}` for
/// the first edit that fails, the validation error of the edited snapshot,
/// or [`Error::InvalidTiming`] if the edited timing plan is inconsistent.
pub fn apply_edits(base: &Snapshot, change_set: &ChangeSet) -> Result<EditOutcome, Error> {
    let mut edited = base.clone();
    for (index, edit) in change_set.edits.iter().enumerate() {
        edit.apply(&mut edited).map_err(|e| match e {
            Error::InvalidInput { path, reason } => Error::InvalidInput {
                path: format!("/edits/{index}{path}"),
                reason,
            },
            other => other,
        })?;
    }

    edited.validate()?;
    let cycle_length = edited.node.timing.cycle_length;
    for phase in &edited.node.timing.phases {
        check_timing(&PhaseTiming {
            id: phase.id.clone(),
            cycle_length,
            effective_green: phase.effective_green,
            lost_time: phase.lost_time,
            control_type: phase.control_type,
        })?;
    }

    edited.version = base.version.checked_add(1).ok_or_else(|| {
        Error::invalid_input("/version", format!("version {} cannot be advanced", base.version))
    })?;
    let diff = diff(base, &edited)?;

    info!(
        "Change set '{}' applied to {} v{}: {} edits, {} changes",
        change_set.name,
        base.scenario_id,
        base.version,
        change_set.edits.len(),
        diff.len()
    );
    Ok(EditOutcome {
        snapshot: edited,
        diff,
    })
}
