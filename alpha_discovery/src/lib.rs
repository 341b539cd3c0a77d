#![warn(
    clippy::doc_markdown,
    missing_debug_implementations,
    rust_2018_idioms,
    missing_docs
)]
#![allow(clippy::needless_doctest_main)]
#![doc = include_str!("../README.md")]

pub mod core;

pub mod discovery;

#[doc(inline)]
pub use crate::core::{
    event_data::case_centric::{
        constants::ACTIVITY_NAME,
        xes::{import_xes, import_xes_file, import_xes_slice, import_xes_str, XESImportOptions},
        Event, EventLog, Trace,
    },
    io::Importable,
    process_models::case_centric::petri_net::{
        replay_log, replay_trace, NodeID, PetriNet, PetriNetError, PlaceID, TransitionID,
    },
};

#[doc(inline)]
pub use discovery::case_centric::alpha::full::{
    alpha_discover_petri_net, alpha_discover_petri_net_with_activity_key,
};
