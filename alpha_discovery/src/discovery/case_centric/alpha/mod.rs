//! Alpha Process Discovery Algorithm
/// Footprint (ordering relations) of an event log
pub mod relations;
/// Alpha place discovery (merging and maximality)
pub mod place_discovery;
/// Building the Petri net from discovered places
pub mod synthesis;
/// Full Alpha Discovery algorithm
pub mod full;

pub use full::{alpha_discover_petri_net, alpha_discover_petri_net_with_activity_key};
pub use place_discovery::{discover_places, CandidatePlace};
pub use relations::{Footprint, Relation};
pub use synthesis::NetSynthesizer;
