use itertools::{EitherOrBoth, Itertools};

use super::fields::{
    APPROACH_FIELDS, LANE_GROUP_FIELDS, NODE_FIELDS, PHASE_FIELDS, approach_field,
    lane_group_field, node_field, phase_field,
};
use super::{ChangeRecord, DiffResult, FieldValue, SnapshotRef};
use crate::model::{EntityPath, Field, Snapshot};
use crate::Error;

/// Computes the changes that turn `a` into `b`.
///
/// Neither snapshot is validated; only their identity schemes must be
/// usable. The result is a pure function of the two trees and ignores the
/// order entities are listed in.
///
/// # Errors
///
/// Returns [`Error::DiffIdentityMismatch`] when the snapshots describe
/// different nodes, or when either snapshot repeats an identifier, since
/// entities could then not be matched unambiguously.
pub fn diff(a: &Snapshot, b: &Snapshot) -> Result<DiffResult, Error> {
    if a.node.id != b.node.id {
        return Err(Error::DiffIdentityMismatch {
            reason: format!("node {} cannot be compared with node {}", a.node.id, b.node.id),
        });
    }
    check_identities(a)?;
    check_identities(b)?;

    let a_sorted = a.canonical();
    let b_sorted = b.canonical();
    let (old, new) = (&a_sorted.node, &b_sorted.node);

    let mut changes = Vec::new();
    compare_fields(&mut changes, &EntityPath::Node, &NODE_FIELDS, |field| {
        (node_field(old, field), node_field(new, field))
    });

    let phases = old
        .timing
        .phases
        .iter()
        .merge_join_by(&new.timing.phases, |x, y| x.id.cmp(&y.id));
    for pair in phases {
        match pair {
            EitherOrBoth::Left(phase) => changes.push(ChangeRecord::between(
                EntityPath::phase(&phase.id).whole(),
                Some(FieldValue::PhaseDefinition(phase.clone())),
                None,
            )),
            EitherOrBoth::Right(phase) => changes.push(ChangeRecord::between(
                EntityPath::phase(&phase.id).whole(),
                None,
                Some(FieldValue::PhaseDefinition(phase.clone())),
            )),
            EitherOrBoth::Both(x, y) => {
                compare_fields(&mut changes, &EntityPath::phase(&x.id), &PHASE_FIELDS, |field| {
                    (phase_field(x, field), phase_field(y, field))
                });
            }
        }
    }

    let approaches = old
        .approaches
        .iter()
        .merge_join_by(&new.approaches, |x, y| x.id.cmp(&y.id));
    for pair in approaches {
        match pair {
            EitherOrBoth::Left(approach) => changes.push(ChangeRecord::between(
                EntityPath::approach(&approach.id).whole(),
                Some(FieldValue::Approach(Box::new(approach.clone()))),
                None,
            )),
            EitherOrBoth::Right(approach) => changes.push(ChangeRecord::between(
                EntityPath::approach(&approach.id).whole(),
                None,
                Some(FieldValue::Approach(Box::new(approach.clone()))),
            )),
            EitherOrBoth::Both(x, y) => {
                let entity = EntityPath::approach(&x.id);
                compare_fields(&mut changes, &entity, &APPROACH_FIELDS, |field| {
                    (approach_field(x, field), approach_field(y, field))
                });

                let groups = x
                    .lane_groups
                    .iter()
                    .merge_join_by(&y.lane_groups, |g, h| g.id.cmp(&h.id));
                for group_pair in groups {
                    match group_pair {
                        EitherOrBoth::Left(group) => changes.push(ChangeRecord::between(
                            EntityPath::lane_group(&x.id, &group.id).whole(),
                            Some(FieldValue::LaneGroup(Box::new(group.clone()))),
                            None,
                        )),
                        EitherOrBoth::Right(group) => changes.push(ChangeRecord::between(
                            EntityPath::lane_group(&x.id, &group.id).whole(),
                            None,
                            Some(FieldValue::LaneGroup(Box::new(group.clone()))),
                        )),
                        EitherOrBoth::Both(g, h) => {
                            let entity = EntityPath::lane_group(&x.id, &g.id);
                            compare_fields(&mut changes, &entity, &LANE_GROUP_FIELDS, |field| {
                                (lane_group_field(g, field), lane_group_field(h, field))
                            });
                        }
                    }
                }
            }
        }
    }

    changes.sort_by(|x, y| x.path.cmp(&y.path));
    Ok(DiffResult {
        node: a.node.id.clone(),
        from: SnapshotRef::of(a),
        to: SnapshotRef::of(b),
        changes,
    })
}

fn compare_fields<F>(changes: &mut Vec<ChangeRecord>, entity: &EntityPath, fields: &[Field], values: F)
where
    F: Fn(Field) -> (Option<FieldValue>, Option<FieldValue>),
{
    for &field in fields {
        let (old, new) = values(field);
        if old != new {
            changes.push(ChangeRecord::between(entity.clone().field(field), old, new));
        }
    }
}

fn check_identities(snapshot: &Snapshot) -> Result<(), Error> {
    let node = &snapshot.node;
    let mismatch = |what: String| Error::DiffIdentityMismatch {
        reason: format!(
            "{what} is not unique in scenario {} version {}",
            snapshot.scenario_id, snapshot.version
        ),
    };

    if let Some(id) = node.timing.phases.iter().map(|p| &p.id).duplicates().next() {
        return Err(mismatch(format!("phase {id}")));
    }
    if let Some(id) = node.approaches.iter().map(|a| &a.id).duplicates().next() {
        return Err(mismatch(format!("approach {id}")));
    }
    for approach in &node.approaches {
        if let Some(id) = approach.lane_groups.iter().map(|g| &g.id).duplicates().next() {
            return Err(mismatch(format!("lane group {id} on approach {}", approach.id)));
        }
    }
    Ok(())
}
