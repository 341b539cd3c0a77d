//! Petri net
pub(crate) mod petri_net_struct;
pub use petri_net_struct::*;
pub mod simulation;
pub use simulation::{replay_log, replay_trace, LogReplaySummary, ReplayOutcome};
