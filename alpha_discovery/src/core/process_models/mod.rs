//! Process Models
//!
//! Models discovered from (or replayed against) event data
pub mod case_centric;
