use log::debug;

use super::fields::{
    approach_field, lane_group_field, node_field, phase_field, set_approach_field,
    set_lane_group_field, set_node_field, set_phase_field,
};
use super::{ChangeRecord, DiffResult, FieldValue};
use crate::model::{EntityPath, Field, FieldPath, Node, Snapshot};
use crate::Error;

/// Replays `diff` on `snapshot`, producing the snapshot the diff leads to.
///
/// Every record's old value must match the current value at its path, so a
/// diff only applies to the snapshot it was taken from (or one equal to it
/// at every touched path). The result is stamped with the diff's target
/// scenario id and version and returned in identifier order.
///
/// # Errors
///
/// Returns [`Error::DiffIdentityMismatch`] if `snapshot` describes a
/// different node, and [`Error::PatchConflict`] for the first record that
/// does not match.
pub fn apply_diff(snapshot: &Snapshot, diff: &DiffResult) -> Result<Snapshot, Error> {
    if snapshot.node.id != diff.node {
        return Err(Error::DiffIdentityMismatch {
            reason: format!("diff of node {} applied to node {}", diff.node, snapshot.node.id),
        });
    }

    let mut patched = snapshot.canonical();
    for record in &diff.changes {
        apply_record(&mut patched.node, record)?;
    }
    patched.scenario_id = diff.to.scenario_id.clone();
    patched.version = diff.to.version;

    debug!(
        "Applied {} changes to node {}: {} v{} -> {} v{}",
        diff.len(),
        diff.node,
        snapshot.scenario_id,
        snapshot.version,
        patched.scenario_id,
        patched.version
    );
    Ok(patched.canonical())
}

fn apply_record(node: &mut Node, record: &ChangeRecord) -> Result<(), Error> {
    let path = &record.path;
    match path.field {
        None => replace_entity(node, record),
        Some(field) => {
            let current = read_field(node, path, field)?;
            if current != record.old {
                return Err(stale(path, current.as_ref(), record.old.as_ref()));
            }
            write_field(node, path, field, record.new.clone())
        }
    }
}

fn stale(path: &FieldPath, current: Option<&FieldValue>, expected: Option<&FieldValue>) -> Error {
    Error::conflict(
        path,
        format!("expected {expected:?}, found {current:?}"),
    )
}

fn missing(path: &FieldPath) -> Error {
    Error::conflict(path, "entity does not exist")
}

fn read_field(node: &Node, path: &FieldPath, field: Field) -> Result<Option<FieldValue>, Error> {
    match &path.entity {
        EntityPath::Node => Ok(node_field(node, field)),
        EntityPath::Phase { phase } => node
            .timing
            .phase(phase)
            .map(|phase| phase_field(phase, field))
            .ok_or_else(|| missing(path)),
        EntityPath::Approach { approach } => node
            .approach(approach)
            .map(|approach| approach_field(approach, field))
            .ok_or_else(|| missing(path)),
        EntityPath::LaneGroup {
            approach,
            lane_group,
        } => node
            .approach(approach)
            .and_then(|approach| approach.lane_group(lane_group))
            .map(|group| lane_group_field(group, field))
            .ok_or_else(|| missing(path)),
    }
}

fn write_field(
    node: &mut Node,
    path: &FieldPath,
    field: Field,
    value: Option<FieldValue>,
) -> Result<(), Error> {
    match &path.entity {
        EntityPath::Node => set_node_field(node, path, field, value),
        EntityPath::Phase { phase } => {
            let phase = node.timing.phase_mut(phase).ok_or_else(|| missing(path))?;
            set_phase_field(phase, path, field, value)
        }
        EntityPath::Approach { approach } => {
            let approach = node.approach_mut(approach).ok_or_else(|| missing(path))?;
            set_approach_field(approach, path, field, value)
        }
        EntityPath::LaneGroup {
            approach,
            lane_group,
        } => {
            let group = node
                .approach_mut(approach)
                .and_then(|approach| approach.lane_group_mut(lane_group))
                .ok_or_else(|| missing(path))?;
            set_lane_group_field(group, path, field, value)
        }
    }
}

/// Adds, removes or replaces a whole phase, approach or lane group after
/// checking the current definition against the record's old value.
fn replace_entity(node: &mut Node, record: &ChangeRecord) -> Result<(), Error> {
    let path = &record.path;
    let wrong_value = || Error::conflict(path, "value does not define this kind of entity");

    match &path.entity {
        EntityPath::Node => Err(Error::conflict(path, "the node itself cannot be replaced")),
        EntityPath::Phase { phase: id } => {
            let phases = &mut node.timing.phases;
            let index = phases.iter().position(|phase| &phase.id == id);
            let current = index.map(|i| FieldValue::PhaseDefinition(phases[i].clone()));
            if current != record.old {
                return Err(stale(path, current.as_ref(), record.old.as_ref()));
            }
            let replacement = match &record.new {
                None => None,
                Some(FieldValue::PhaseDefinition(phase)) if &phase.id == id => Some(phase.clone()),
                Some(_) => return Err(wrong_value()),
            };
            splice(phases, index, replacement);
            Ok(())
        }
        EntityPath::Approach { approach: id } => {
            let approaches = &mut node.approaches;
            let index = approaches.iter().position(|approach| &approach.id == id);
            let current = index.map(|i| FieldValue::Approach(Box::new(approaches[i].clone())));
            if current != record.old {
                return Err(stale(path, current.as_ref(), record.old.as_ref()));
            }
            let replacement = match &record.new {
                None => None,
                Some(FieldValue::Approach(approach)) if &approach.id == id => {
                    let mut approach = approach.as_ref().clone();
                    approach.lane_groups.sort_by(|a, b| a.id.cmp(&b.id));
                    Some(approach)
                }
                Some(_) => return Err(wrong_value()),
            };
            splice(approaches, index, replacement);
            Ok(())
        }
        EntityPath::LaneGroup {
            approach,
            lane_group: id,
        } => {
            let groups = &mut node
                .approach_mut(approach)
                .ok_or_else(|| Error::conflict(path, format!("approach {approach} does not exist")))?
                .lane_groups;
            let index = groups.iter().position(|group| &group.id == id);
            let current = index.map(|i| FieldValue::LaneGroup(Box::new(groups[i].clone())));
            if current != record.old {
                return Err(stale(path, current.as_ref(), record.old.as_ref()));
            }
            let replacement = match &record.new {
                None => None,
                Some(FieldValue::LaneGroup(group)) if &group.id == id => Some(group.as_ref().clone()),
                Some(_) => return Err(wrong_value()),
            };
            splice(groups, index, replacement);
            Ok(())
        }
    }
}

fn splice<T>(items: &mut Vec<T>, index: Option<usize>, replacement: Option<T>) {
    match (index, replacement) {
        (Some(i), Some(item)) => items[i] = item,
        (Some(i), None) => {
            items.remove(i);
        }
        (None, Some(item)) => items.push(item),
        (None, None) => {}
    }
}
