use chrono::Utc;
use log::{info, warn};
use rayon::prelude::*;
use signalcap_core::prelude::*;

/// Evaluates independent snapshots in parallel.
///
/// Returns one result per snapshot, in input order. A failing snapshot does
/// not affect the others. Every result of one batch shares the same
/// creation timestamp.
pub fn run_batch(snapshots: &[Snapshot], config: &EngineConfig) -> Vec<Result<NodeResult, Error>> {
    let created_at = Utc::now();
    info!(
        "Evaluating {} scenarios with engine {}",
        snapshots.len(),
        config.engine_version
    );

    let results: Vec<_> = snapshots
        .par_iter()
        .map(|snapshot| run_with_config(snapshot, config, created_at))
        .collect();

    for (snapshot, result) in snapshots.iter().zip(&results) {
        if let Err(e) = result {
            warn!(
                "Scenario {} v{} failed: {e}",
                snapshot.scenario_id, snapshot.version
            );
        }
    }
    results
}
