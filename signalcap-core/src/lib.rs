//! Deterministic HCM signalized intersection engine and scenario diffing.
//!
//! A [`Snapshot`](model::Snapshot) describes one intersection at one
//! scenario version. [`run`](engine::run) evaluates it into a
//! [`NodeResult`](engine::NodeResult) stamped with the engine version and a
//! hash of the resolved input. [`diff`](diff::diff) compares two snapshots
//! field by field and [`apply_diff`](diff::apply_diff) replays the result.

pub mod analysis;
pub mod config;
pub mod diff;
pub mod engine;
mod error;
pub mod model;
pub mod prelude;
pub mod resolve;
pub mod scenario;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use error::{Error, ErrorKind, TimingFault};
