//! Critical intersection volume-to-capacity ratio.
//!
//! `Xc = Σ max(v/s) · C / (C − L)` over phases that run in sequence, where
//! `L` is the lost time summed over the phases that serve a lane group.

use hashbrown::HashMap;

use crate::error::TimingFault;
use crate::model::PhaseId;
use crate::resolve::PhaseTiming;

/// Computes `Xc` from per-lane-group flow ratios keyed by serving phase.
///
/// Phases are summed in the order given, so the result does not depend on
/// the order flow ratios arrive in. Phases without any flow ratio take no
/// part in the sum or in the lost time.
///
/// # Errors
///
/// Returns [`TimingFault::LostTimeExceedsCycle`] when the serving phases
/// leave no time for green.
pub fn critical_vc<'a, I>(
    phases: &[PhaseTiming],
    cycle_length: f64,
    flow_ratios: I,
) -> Result<f64, TimingFault>
where
    I: IntoIterator<Item = (&'a PhaseId, f64)>,
{
    let mut critical: HashMap<&PhaseId, f64> = HashMap::with_capacity(phases.len());
    for (phase, ratio) in flow_ratios {
        let entry = critical.entry(phase).or_insert(0.0);
        *entry = entry.max(ratio);
    }

    let (sum, lost) = phases
        .iter()
        .filter_map(|phase| critical.get(&phase.id).map(|ratio| (*ratio, phase.lost_time)))
        .fold((0.0, 0.0), |(sum, lost), (ratio, phase_lost)| {
            (sum + ratio, lost + phase_lost)
        });
    if lost >= cycle_length {
        return Err(TimingFault::LostTimeExceedsCycle {
            lost,
            cycle: cycle_length,
        });
    }
    Ok(sum * cycle_length / (cycle_length - lost))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_support::timing;

    fn phase(id: &str, lost: f64) -> PhaseTiming {
        PhaseTiming {
            id: id.into(),
            lost_time: lost,
            ..timing(100.0, 40.0)
        }
    }

    #[test]
    fn sums_the_critical_ratio_of_each_phase() {
        let phases = [phase("1", 5.0), phase("2", 5.0)];
        let one: PhaseId = "1".into();
        let two: PhaseId = "2".into();
        let ratios = [(&one, 0.20), (&one, 0.35), (&two, 0.25)];
        let xc = critical_vc(&phases, 100.0, ratios).unwrap();
        assert!((xc - 0.60 * 100.0 / 90.0).abs() < 1e-12);
    }

    #[test]
    fn unserved_phases_lose_no_time() {
        let phases = [phase("1", 5.0), phase("2", 5.0), phase("9", 60.0)];
        let one: PhaseId = "1".into();
        let two: PhaseId = "2".into();
        let ratios = [(&one, 0.30), (&two, 0.20)];
        let xc = critical_vc(&phases, 100.0, ratios).unwrap();
        assert!((xc - 0.50 * 100.0 / 90.0).abs() < 1e-12);
        assert_eq!(
            critical_vc(&phases, 100.0, std::iter::empty::<(&PhaseId, f64)>()),
            Ok(0.0)
        );
    }

    #[test]
    fn rejects_lost_time_consuming_the_cycle() {
        let phases = [phase("1", 50.0), phase("2", 50.0)];
        let one: PhaseId = "1".into();
        let two: PhaseId = "2".into();
        assert_eq!(
            critical_vc(&phases, 100.0, [(&one, 0.2), (&two, 0.2)]),
            Err(TimingFault::LostTimeExceedsCycle {
                lost: 100.0,
                cycle: 100.0
            })
        );
    }
}
