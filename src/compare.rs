use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use signalcap_core::prelude::*;

/// Everything needed to answer "what changed between scenario A and B":
/// the input diff, both runs, and how their results moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub input_diff: DiffResult,
    pub base: NodeResult,
    pub alternative: NodeResult,
    pub results: ResultComparison,
}

/// Diffs two snapshots of the same node and runs both through the engine.
///
/// # Errors
///
/// Returns [`Error::DiffIdentityMismatch`] if the snapshots cannot be
/// compared, or the first error of either run (base first).
pub fn compare_scenarios(
    base: &Snapshot,
    alternative: &Snapshot,
    config: &EngineConfig,
) -> Result<ScenarioComparison, Error> {
    let input_diff = diff(base, alternative)?;

    let created_at = Utc::now();
    let (base_run, alternative_run) = rayon::join(
        || run_with_config(base, config, created_at),
        || run_with_config(alternative, config, created_at),
    );
    let base_result = base_run?;
    let alternative_result = alternative_run?;
    let results = compare_results(&base_result, &alternative_result)?;

    info!(
        "Compared {} v{} with {} v{}: {} input changes, delay {:+.1} s/veh, LOS {} -> {}",
        base.scenario_id,
        base.version,
        alternative.scenario_id,
        alternative.version,
        input_diff.len(),
        results.control_delay.delta,
        results.los_before,
        results.los_after
    );

    Ok(ScenarioComparison {
        input_diff,
        base: base_result,
        alternative: alternative_result,
        results,
    })
}
