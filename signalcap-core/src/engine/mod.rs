//! Engine orchestrator: validates and resolves a snapshot, runs every lane
//! group through capacity, delay and LOS, and aggregates to approach and
//! node level.
//!
//! Lane groups are independent of each other and are evaluated on the rayon
//! pool. Their results are collected in resolved order and all reductions
//! run sequentially over that order, so output does not depend on
//! scheduling.

mod hash;
mod result;

pub use hash::InputHash;
pub use result::{ApproachResult, LaneGroupResult, NodeResult};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use rayon::prelude::*;

use crate::analysis::{aggregate, classify, compute_capacity, compute_delay, critical_vc};
use crate::config::EngineConfig;
use crate::model::{EntityPath, Field, Snapshot};
use crate::resolve::{ResolvedIntersection, ResolvedLaneGroup, resolve};
use crate::Error;
use result::NodeTotals;

/// Runs the full analysis of `snapshot`, stamped with `engine_version` and
/// the current time.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for an invalid snapshot or version
/// string, and [`Error::LaneGroup`] wrapping the first lane group failure.
pub fn run(snapshot: &Snapshot, engine_version: &str) -> Result<NodeResult, Error> {
    let config = EngineConfig::with_version(engine_version)?;
    run_with_config(snapshot, &config, Utc::now())
}

/// Runs the full analysis with an explicit configuration and creation time.
///
/// Two calls with the same snapshot, configuration and timestamp return
/// equal results.
///
/// # Errors
///
/// See [`run`]. Lost time consuming the whole cycle leaves the critical v/c
/// undefined but does not fail the run.
pub fn run_with_config(
    snapshot: &Snapshot,
    config: &EngineConfig,
    created_at: DateTime<Utc>,
) -> Result<NodeResult, Error> {
    snapshot.validate()?;
    let resolved = resolve(snapshot)?;
    let input_hash = InputHash::of(&resolved)?;

    let groups: Vec<&ResolvedLaneGroup> = resolved.lane_groups().collect();
    let evaluate = |group: &&ResolvedLaneGroup| evaluate_lane_group(&resolved, group);
    let outcomes: Vec<Result<LaneGroupResult, Error>> = if config.parallel {
        groups.par_iter().map(evaluate).collect()
    } else {
        groups.iter().map(evaluate).collect()
    };
    let lane_groups = outcomes.into_iter().collect::<Result<Vec<_>, Error>>()?;

    let approaches = aggregate_approaches(&resolved, &lane_groups)?;

    let node = aggregate(
        lane_groups
            .iter()
            .map(|group| (group.control_delay, group.adjusted_demand)),
    )
    .ok_or_else(|| Error::invalid_input("/approaches", "intersection has no lane groups"))?;

    let critical = match critical_vc(
        &resolved.phases,
        resolved.cycle_length,
        lane_groups
            .iter()
            .map(|group| (&group.phase, group.flow_ratio)),
    ) {
        Ok(critical) => {
            if critical > 1.0 {
                warn!(
                    "Node {}: critical v/c {critical:.3} exceeds 1.0, the signal timing cannot serve demand",
                    resolved.node
                );
            }
            Some(critical)
        }
        Err(fault) => {
            warn!("Node {}: critical v/c undefined, {fault}", resolved.node);
            None
        }
    };

    info!(
        "Node {} evaluated: {} lane groups, input {}, delay {:.1} s/veh, LOS {}",
        resolved.node,
        lane_groups.len(),
        input_hash.short(),
        node.control_delay,
        node.los
    );

    Ok(NodeResult::new(
        (snapshot.scenario_id.clone(), snapshot.version),
        resolved.node.clone(),
        (config.engine_version.clone(), input_hash, created_at),
        NodeTotals {
            control_delay: node.control_delay,
            los: node.los,
            critical_vc: critical,
            total_demand: node.total_weight,
        },
        approaches,
        lane_groups,
    ))
}

fn evaluate_lane_group(
    resolved: &ResolvedIntersection,
    group: &ResolvedLaneGroup,
) -> Result<LaneGroupResult, Error> {
    let wrap = |source: Error| Error::LaneGroup {
        approach: group.approach.clone(),
        lane_group: group.id.clone(),
        source: Box::new(source),
    };

    let phase = resolved.phase(&group.phase).ok_or_else(|| {
        wrap(Error::invalid_input(
            EntityPath::lane_group(&group.approach, &group.id)
                .field(Field::LaneGroupPhase)
                .to_string(),
            format!("undefined phase {}", group.phase),
        ))
    })?;
    let capacity = compute_capacity(group, phase).map_err(wrap)?;
    let delay = compute_delay(
        group,
        phase,
        capacity.capacity,
        group.volume.demand_flow_rate,
    )
    .map_err(wrap)?;
    let los = classify(delay.control_delay);

    debug!(
        "{}/{}: s = {:.1}, c = {:.1}, v/c = {:.3}, d = {:.2} s/veh ({los})",
        group.approach,
        group.id,
        capacity.saturation.total,
        capacity.capacity,
        delay.vc_ratio,
        delay.control_delay
    );
    if delay.vc_ratio > 1.0 {
        warn!(
            "Lane group {}/{} is oversaturated: v/c = {:.3}",
            group.approach, group.id, delay.vc_ratio
        );
    }

    Ok(LaneGroupResult {
        approach: group.approach.clone(),
        id: group.id.clone(),
        phase: group.phase.clone(),
        saturation: capacity.saturation,
        capacity: capacity.capacity,
        green_ratio: capacity.green_ratio,
        adjusted_demand: delay.adjusted_demand,
        flow_ratio: delay.adjusted_demand / capacity.saturation.total,
        vc_ratio: delay.vc_ratio,
        uniform_delay: delay.uniform_delay,
        incremental_delay: delay.incremental_delay,
        progression_factor: delay.progression_factor,
        control_delay: delay.control_delay,
        regime: delay.regime,
        los,
    })
}

fn aggregate_approaches(
    resolved: &ResolvedIntersection,
    lane_groups: &[LaneGroupResult],
) -> Result<Vec<ApproachResult>, Error> {
    resolved
        .approaches
        .iter()
        .map(|approach| {
            let members = lane_groups
                .iter()
                .filter(|group| group.approach == approach.id);
            let summary = aggregate(members.map(|group| (group.control_delay, group.adjusted_demand)))
                .ok_or_else(|| {
                    Error::invalid_input(
                        format!("{}/lane_groups", EntityPath::approach(&approach.id)),
                        "approach has no lane groups",
                    )
                })?;
            Ok(ApproachResult {
                id: approach.id.clone(),
                direction: approach.direction,
                demand: summary.total_weight,
                control_delay: summary.control_delay,
                los: summary.los,
            })
        })
        .collect()
}
