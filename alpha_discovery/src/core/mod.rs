//! Core modules for process discovery
//!
//! Event data on the input side, process models on the output side.

pub use chrono;
pub mod event_data;

/// IO Traits
pub mod io;

pub mod process_models;

pub use event_data::case_centric::EventLog;
pub use process_models::case_centric::petri_net::PetriNet;
