//! Case-centric process discovery
pub mod alpha;
