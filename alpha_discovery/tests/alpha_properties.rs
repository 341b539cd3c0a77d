//! Property-based tests for Alpha discovery and the Petri net runtime

use std::collections::BTreeSet;

use alpha_discovery::{
    alpha_discover_petri_net,
    discovery::case_centric::alpha::{Footprint, NetSynthesizer},
    EventLog, PetriNet, PlaceID, TransitionID,
};
use proptest::collection::vec;
use proptest::prelude::*;

const ACTS: [&str; 5] = ["a", "b", "c", "d", "e"];

fn arb_traces() -> impl Strategy<Value = Vec<Vec<&'static str>>> {
    vec(vec((0..ACTS.len()).prop_map(|i| ACTS[i]), 1..8), 0..6)
}

fn to_log(traces: &[Vec<&str>]) -> EventLog {
    EventLog::from_activity_traces(
        traces
            .iter()
            .enumerate()
            .map(|(i, t)| (format!("case-{i}"), t.clone())),
    )
}

fn pair(a: &str, b: &str) -> (String, String) {
    (a.to_string(), b.to_string())
}

proptest! {
    /// Exactly one relation holds for each ordered pair of distinct activities
    #[test]
    fn relations_partition_activity_pairs(traces in arb_traces()) {
        let fp = Footprint::from_activity_traces(traces);
        for a in &fp.activities {
            for b in &fp.activities {
                if a == b {
                    prop_assert!(!fp.independent.contains(&pair(a, b)));
                    continue;
                }
                let holding = [
                    fp.causal.contains(&pair(a, b)),
                    fp.causal.contains(&pair(b, a)),
                    fp.parallel.contains(&pair(a, b)),
                    fp.independent.contains(&pair(a, b)),
                ]
                .into_iter()
                .filter(|h| *h)
                .count();
                prop_assert_eq!(holding, 1, "{} / {}", a, b);
            }
        }
    }

    #[test]
    fn parallel_is_symmetric(traces in arb_traces()) {
        let fp = Footprint::from_activity_traces(traces);
        for (a, b) in &fp.parallel {
            prop_assert!(fp.parallel.contains(&pair(b, a)));
        }
    }

    /// No discovered place is covered by another, different one
    #[test]
    fn discovered_places_are_maximal(traces in arb_traces()) {
        let places = Footprint::from_activity_traces(traces).discover_places();
        for p1 in &places {
            for p2 in &places {
                if p1 != p2 {
                    prop_assert!(!p1.is_covered_by(p2), "{} covered by {}", p1, p2);
                }
            }
        }
    }

    /// One transition per activity, start place feeds start activities, end place is fed by end activities
    #[test]
    fn synthesized_net_is_complete(traces in arb_traces()) {
        let log = to_log(&traces);
        let fp = Footprint::from_event_log(&log, alpha_discovery::ACTIVITY_NAME);
        let places = fp.discover_places();
        let net = NetSynthesizer::new()
            .synthesize(&fp.activities, &fp.start_activities, &fp.end_activities, &places)
            .unwrap();

        prop_assert_eq!(net.num_transitions(), fp.activities.len());
        prop_assert_eq!(net.num_places(), places.len() + 2);
        for act in &fp.activities {
            let named = net.transitions().values().filter(|t| &t.name == act).count();
            prop_assert_eq!(named, 1);
        }

        // Start place is the only marked place, end place is the final marking
        let start: Vec<PlaceID> = net.places().filter(|p| net.get_tokens(*p) > 0).collect();
        prop_assert_eq!(start.len(), 1);
        prop_assert_eq!(net.get_tokens(start[0]), 1);
        let end: Vec<PlaceID> = net.final_marking().unwrap().keys().copied().collect();
        prop_assert_eq!(end.len(), 1);

        for act in &fp.start_activities {
            let t = net.transition_name_to_id(act).unwrap();
            prop_assert!(net.transition(t).unwrap().inputs.contains(&start[0]));
        }
        for act in &fp.end_activities {
            let t = net.transition_name_to_id(act).unwrap();
            prop_assert!(net.transition(t).unwrap().outputs.contains(&end[0]));
        }

        // Same log, same net
        prop_assert_eq!(alpha_discover_petri_net(&log).unwrap(), net);
    }

    /// Firing changes the token total by |postset| - |preset|, failed firings change nothing
    #[test]
    fn firing_conserves_tokens(traces in arb_traces(), choices in vec(0usize..8, 0..40)) {
        let mut net = alpha_discover_petri_net(&to_log(&traces)).unwrap();
        let transitions: Vec<TransitionID> = net.transitions().keys().copied().collect();
        for c in choices {
            let t = transitions.get(c).copied().unwrap_or(TransitionID(1000));
            let before = net.marking();
            let total_before = net.total_tokens() as i64;
            let enabled = net.is_enabled(t);
            prop_assert_eq!(net.fire_transition(t), enabled);
            if enabled {
                let diff = net.postset_of_transition(t).len() as i64
                    - net.preset_of_transition(t).len() as i64;
                prop_assert_eq!(net.total_tokens() as i64, total_before + diff);
            } else {
                prop_assert_eq!(net.marking(), before);
            }
        }
    }

    /// Registering a place or transition a second time changes nothing
    #[test]
    fn registration_is_idempotent(
        ids in vec(1u64..20, 1..20),
        marks in vec(1u64..20, 0..20)
    ) {
        let mut net = PetriNet::new();
        for id in &ids {
            net.add_place(PlaceID(*id));
            net.add_transition(format!("t{id}"), TransitionID(*id));
        }
        for m in &marks {
            net.add_marking(PlaceID(*m));
        }
        let snapshot = net.clone();
        for id in &ids {
            net.add_place(PlaceID(*id));
            net.add_transition("other", TransitionID(*id));
        }
        prop_assert_eq!(&net, &snapshot);
        let unique: BTreeSet<u64> = ids.iter().copied().collect();
        prop_assert_eq!(net.num_places(), unique.len());
        prop_assert_eq!(net.num_transitions(), unique.len());
    }

    /// Nets of strictly sequential logs replay their own log
    #[test]
    fn sequential_logs_fit(len in 1usize..6, copies in 1usize..4) {
        let trace: Vec<&str> = ACTS[..len].to_vec();
        let log = to_log(&vec![trace; copies]);
        let net = alpha_discover_petri_net(&log).unwrap();
        let summary = alpha_discovery::replay_log(&net, &log, alpha_discovery::ACTIVITY_NAME);
        prop_assert_eq!(summary.fitting_cases, copies);
        prop_assert_eq!(summary.non_fitting_cases, 0);
    }
}
