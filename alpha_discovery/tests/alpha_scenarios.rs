use std::collections::BTreeSet;

use alpha_discovery::{
    alpha_discover_petri_net,
    discovery::case_centric::alpha::{CandidatePlace, Footprint},
    import_xes_str, replay_log, replay_trace, EventLog, PlaceID, XESImportOptions, ACTIVITY_NAME,
};

fn set(acts: &[&str]) -> BTreeSet<String> {
    acts.iter().map(|a| a.to_string()).collect()
}

fn pairs(ps: &[(&str, &str)]) -> BTreeSet<(String, String)> {
    ps.iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

#[test]
fn concurrent_activities_footprint() {
    let log = EventLog::from_activity_traces(vec![
        ("1", vec!["A", "B", "C"]),
        ("2", vec!["A", "C", "B"]),
    ]);
    let fp = Footprint::from_event_log(&log, ACTIVITY_NAME);
    assert_eq!(
        fp.direct_succession,
        pairs(&[("A", "B"), ("B", "C"), ("A", "C"), ("C", "B")])
    );
    assert_eq!(fp.causal, pairs(&[("A", "B"), ("A", "C")]));
    assert_eq!(fp.parallel, pairs(&[("B", "C"), ("C", "B")]));
    assert!(fp.independent.is_empty());

    // Both B and C feed the end place, so a complete case leaves two tokens there
    let net = alpha_discover_petri_net(&log).unwrap();
    let outcome = replay_trace(&net, ["A", "B", "C"]);
    assert_eq!(outcome.stuck_at, None);
    assert!(!outcome.reached_final_marking);
}

#[test]
fn single_case_sequence() {
    let log = EventLog::from_activity_traces(vec![("only", vec!["A", "B"])]);
    let fp = Footprint::from_event_log(&log, ACTIVITY_NAME);
    assert_eq!(
        fp.discover_places(),
        vec![CandidatePlace {
            inputs: set(&["A"]),
            outputs: set(&["B"]),
        }]
    );

    let mut net = alpha_discover_petri_net(&log).unwrap();
    assert_eq!(net.num_transitions(), 2);
    assert_eq!(net.num_places(), 3);
    let a = net.transition_name_to_id("A").unwrap();
    let b = net.transition_name_to_id("B").unwrap();
    let start = net.preset_of_transition(a);
    let end = net.postset_of_transition(b);
    assert_eq!(start.len(), 1);
    assert_eq!(end.len(), 1);
    assert_eq!(net.get_tokens(start[0]), 1);
    assert_eq!(net.get_tokens(end[0]), 0);
    assert_eq!(net.postset_of_transition(a), net.preset_of_transition(b));

    // Firing A moves the token into the internal place
    let internal = net.postset_of_transition(a)[0];
    assert!(net.fire_transition(a));
    assert_eq!(net.get_tokens(start[0]), 0);
    assert_eq!(net.get_tokens(internal), 1);
    assert!(!net.is_enabled(a));
    assert!(net.is_enabled(b));
    assert!(!net.fire_transition(a));
}

#[test]
fn empty_log_net() {
    let log = EventLog::new();
    assert!(Footprint::from_event_log(&log, ACTIVITY_NAME)
        .activities
        .is_empty());
    let net = alpha_discover_petri_net(&log).unwrap();
    assert_eq!(net.num_transitions(), 0);
    assert_eq!(net.num_edges(), 0);
    let places: Vec<PlaceID> = net.places().collect();
    assert_eq!(places.len(), 2);
    assert_eq!(net.total_tokens(), 1);
}

#[test]
fn choice_log_fits() {
    let log = EventLog::from_activity_traces(vec![
        ("1", vec!["register", "check ticket", "decide"]),
        ("2", vec!["register", "examine", "decide"]),
        ("3", vec!["register", "examine", "decide"]),
    ]);
    let net = alpha_discover_petri_net(&log).unwrap();
    // start, end, register -> {check ticket, examine}, {check ticket, examine} -> decide
    assert_eq!(net.num_places(), 4);
    let summary = replay_log(&net, &log, ACTIVITY_NAME);
    assert_eq!(summary.fitting_cases, 3);
    assert_eq!(summary.non_fitting_cases, 0);

    let unseen = replay_trace(&net, ["register", "decide"]);
    assert_eq!(unseen.stuck_at, Some(1));
}

#[test]
fn discovery_from_xes() {
    let xes = r#"<?xml version="1.0" encoding="UTF-8" ?>
<log xes.version="1.0" xmlns="http://www.xes-standard.org/">
  <trace>
    <string key="concept:name" value="c1"/>
    <event><string key="concept:name" value="a"/><date key="time:timestamp" value="2024-01-01T10:00:00+01:00"/></event>
    <event><string key="concept:name" value="b"/><date key="time:timestamp" value="2024-01-01T11:00:00+01:00"/></event>
  </trace>
  <trace>
    <string key="concept:name" value="c2"/>
    <event><string key="concept:name" value="a"/></event>
    <event><string key="concept:name" value="c"/></event>
  </trace>
</log>"#;
    let log = import_xes_str(xes, &XESImportOptions::default()).unwrap();
    assert_eq!(log.num_cases(), 2);
    let net = alpha_discover_petri_net(&log).unwrap();
    assert_eq!(net.num_transitions(), 3);
    let summary = replay_log(&net, &log, ACTIVITY_NAME);
    assert_eq!(summary.fitting_cases, 2);
}
