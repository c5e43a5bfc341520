//! Level of Service for signalized intersections, from control delay.
//!
//! | LOS | control delay (s/veh) |
//! |-----|-----------------------|
//! | A   | ≤ 10                  |
//! | B   | > 10 and ≤ 20         |
//! | C   | > 20 and ≤ 35         |
//! | D   | > 35 and ≤ 55         |
//! | E   | > 55 and ≤ 80         |
//! | F   | > 80                  |
//!
//! Upper bounds are closed: a delay exactly on a threshold takes the better grade.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Los {
    A,
    B,
    C,
    D,
    E,
    F,
}

/// Upper delay bound of each grade below F, s/veh
pub const LOS_THRESHOLDS: [(Los, f64); 5] = [
    (Los::A, 10.0),
    (Los::B, 20.0),
    (Los::C, 35.0),
    (Los::D, 55.0),
    (Los::E, 80.0),
];

impl Los {
    pub fn letter(self) -> char {
        match self {
            Los::A => 'A',
            Los::B => 'B',
            Los::C => 'C',
            Los::D => 'D',
            Los::E => 'E',
            Los::F => 'F',
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Los::A => "Free-flow operations",
            Los::B => "Stable flow with slight delays",
            Los::C => "Stable flow with acceptable delays",
            Los::D => "Approaching unstable flow",
            Los::E => "Unstable flow, at capacity",
            Los::F => "Oversaturated, forced flow",
        }
    }
}

impl fmt::Display for Los {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// Grades a control delay. Total over all inputs: anything not within a
/// bounded band (including NaN) is F.
pub fn classify(control_delay: f64) -> Los {
    LOS_THRESHOLDS
        .iter()
        .find(|(_, upper)| control_delay <= *upper)
        .map_or(Los::F, |(los, _)| *los)
}

/// Volume-weighted delay of a set of lane groups, re-graded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AggregateDelay {
    pub control_delay: f64,
    pub los: Los,
    /// Sum of the weights, veh/h
    pub total_weight: f64,
}

/// Aggregates `(control delay, weight)` pairs by weighted average.
///
/// Letters are never averaged; the averaged delay is classified again.
/// When every weight is zero the plain mean is used. Returns `None` for an
/// empty input. Summation follows input order.
pub fn aggregate<I>(delays: I) -> Option<AggregateDelay>
where
    I: IntoIterator<Item = (f64, f64)>,
{
    let mut count = 0_u32;
    let mut weighted = 0.0;
    let mut total_weight = 0.0;
    let mut plain = 0.0;
    for (delay, weight) in delays {
        count += 1;
        weighted += delay * weight;
        total_weight += weight;
        plain += delay;
    }
    if count == 0 {
        return None;
    }

    let control_delay = if total_weight > 0.0 {
        weighted / total_weight
    } else {
        warn!("All {count} aggregated lane groups carry zero volume; using unweighted mean delay");
        plain / f64::from(count)
    };

    Some(AggregateDelay {
        control_delay,
        los: classify(control_delay),
        total_weight,
    })
}
