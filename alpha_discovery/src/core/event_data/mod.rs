//! Event Data
//!
//! Case-centric event logs, the input of process discovery
pub mod case_centric;

#[doc(inline)]
pub use case_centric::EventLog;
