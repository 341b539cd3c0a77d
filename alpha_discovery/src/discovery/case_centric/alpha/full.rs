use crate::core::{
    event_data::case_centric::{constants::ACTIVITY_NAME, EventLog},
    process_models::case_centric::petri_net::{PetriNet, PetriNetError},
};

use super::{place_discovery::discover_places, relations::Footprint, synthesis::NetSynthesizer};

///
/// Discover a [`PetriNet`] using the Alpha algorithm
///
/// Activities are read from the [`ACTIVITY_NAME`] (`concept:name`) event attribute.
///
/// An error is only returned if the net construction itself is inconsistent, never because of
/// the contents of the log: An empty log yields a net with only a start and an end place.
///
pub fn alpha_discover_petri_net(event_log: &EventLog) -> Result<PetriNet, PetriNetError> {
    alpha_discover_petri_net_with_activity_key(event_log, ACTIVITY_NAME)
}

/// Run Alpha discovery, reading activities from the event attribute `activity_key`
pub fn alpha_discover_petri_net_with_activity_key(
    event_log: &EventLog,
    activity_key: &str,
) -> Result<PetriNet, PetriNetError> {
    log::info!(
        "Started Alpha Discovery on {} cases ({} events)",
        event_log.num_cases(),
        event_log.num_events()
    );
    let footprint = Footprint::from_event_log(event_log, activity_key);
    log::debug!(
        "Footprint: {} activities, {} causal, {} parallel, {} independent pairs",
        footprint.activities.len(),
        footprint.causal.len(),
        footprint.parallel.len(),
        footprint.independent.len()
    );

    let places = discover_places(&footprint.causal, &footprint.independent);
    for p in &places {
        log::trace!("Place {}", p);
    }

    let net = NetSynthesizer::new().synthesize(
        &footprint.activities,
        &footprint.start_activities,
        &footprint.end_activities,
        &places,
    )?;
    log::info!(
        "Discovered Petri net with {} places, {} transitions and {} edges",
        net.num_places(),
        net.num_transitions(),
        net.num_edges()
    );
    Ok(net)
}
