//! Signalized intersection capacity analysis.
//!
//! Re-exports [`signalcap_core`] and adds operations over many scenarios at
//! once: [`run_batch`] and [`compare_scenarios`].

mod batch;
mod compare;

pub use batch::run_batch;
pub use compare::{ScenarioComparison, compare_scenarios};
pub use signalcap_core::{
    Error, ErrorKind, TimingFault, analysis, config, diff, engine, model, resolve, scenario,
};

pub mod prelude {
    pub use crate::{ScenarioComparison, compare_scenarios, run_batch};
    pub use signalcap_core::prelude::*;
}
