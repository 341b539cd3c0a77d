//! Token game on a [`PetriNet`] and replay of traces
use serde::{Deserialize, Serialize};

use super::petri_net_struct::{PetriNet, TransitionID};
use crate::core::event_data::case_centric::EventLog;

impl PetriNet {
    /// All currently enabled transitions, ordered by ID
    pub fn enabled_transitions(&self) -> Vec<TransitionID> {
        self.transitions()
            .keys()
            .copied()
            .filter(|t| self.is_enabled(*t))
            .collect()
    }

    /// Fire the transition with the given name
    ///
    /// Returns `false` if no transition has this name or it is not enabled.
    pub fn fire_by_name(&mut self, name: &str) -> bool {
        match self.transition_name_to_id(name) {
            Some(t) => self.fire_transition(t),
            None => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// Result of replaying a single trace
pub struct ReplayOutcome {
    /// Number of activities fired before replay stopped
    pub fired: usize,
    /// Index of the first activity that could not fire (unknown or not enabled)
    pub stuck_at: Option<usize>,
    /// Whether the marking after replay equals the final marking
    pub reached_final_marking: bool,
}

impl ReplayOutcome {
    /// Trace could be fully replayed and ended in the final marking
    pub fn is_fitting(&self) -> bool {
        self.stuck_at.is_none() && self.reached_final_marking
    }
}

/// Replay a sequence of activities on a copy of `net`, starting from its current marking
///
/// Replay stops at the first activity without an enabled transition.
pub fn replay_trace<I, S>(net: &PetriNet, activities: I) -> ReplayOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut net = net.clone();
    let mut fired = 0;
    for (i, activity) in activities.into_iter().enumerate() {
        if !net.fire_by_name(activity.as_ref()) {
            return ReplayOutcome {
                fired,
                stuck_at: Some(i),
                reached_final_marking: false,
            };
        }
        fired += 1;
    }
    ReplayOutcome {
        fired,
        stuck_at: None,
        reached_final_marking: net.is_in_final_marking(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
/// Fitness summary of replaying an [`EventLog`]
pub struct LogReplaySummary {
    /// Cases whose trace replays to the final marking
    pub fitting_cases: usize,
    /// Cases that got stuck or did not end in the final marking
    pub non_fitting_cases: usize,
    /// Identifiers of the non-fitting cases, in case order
    pub non_fitting_case_ids: Vec<String>,
}

impl LogReplaySummary {
    /// Fraction of fitting cases (`1.0` for an empty log)
    pub fn fitness(&self) -> f64 {
        let total = self.fitting_cases + self.non_fitting_cases;
        if total == 0 {
            return 1.0;
        }
        self.fitting_cases as f64 / total as f64
    }
}

/// Replay every case of `event_log` on `net` and count the fitting ones
pub fn replay_log(net: &PetriNet, event_log: &EventLog, activity_key: &str) -> LogReplaySummary {
    let mut summary = LogReplaySummary::default();
    for (case_id, trace) in &event_log.cases {
        let outcome = replay_trace(net, trace.activities(activity_key));
        if outcome.is_fitting() {
            summary.fitting_cases += 1;
        } else {
            log::debug!("Case {:?} does not fit: {:?}", case_id, outcome);
            summary.non_fitting_cases += 1;
            summary.non_fitting_case_ids.push(case_id.clone());
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::process_models::case_centric::petri_net::{Marking, PlaceID};
    use crate::ACTIVITY_NAME;

    /// start -> a -> p -> b -> end
    fn ab_net() -> PetriNet {
        let mut net = PetriNet::new();
        for p in 1..=3 {
            net.add_place(PlaceID(p));
        }
        net.add_transition("a", TransitionID(1));
        net.add_transition("b", TransitionID(2));
        net.add_edge(PlaceID(1), TransitionID(1)).unwrap();
        net.add_edge(TransitionID(1), PlaceID(2)).unwrap();
        net.add_edge(PlaceID(2), TransitionID(2)).unwrap();
        net.add_edge(TransitionID(2), PlaceID(3)).unwrap();
        net.add_marking(PlaceID(1));
        net.set_final_marking(Marking::from([(PlaceID(3), 1)]));
        net
    }

    #[test]
    fn enabled_and_fire_by_name() {
        let mut net = ab_net();
        assert_eq!(net.enabled_transitions(), vec![TransitionID(1)]);
        assert!(!net.fire_by_name("b"));
        assert!(!net.fire_by_name("c"));
        assert!(net.fire_by_name("a"));
        assert_eq!(net.enabled_transitions(), vec![TransitionID(2)]);
    }

    #[test]
    fn replay_does_not_touch_net() {
        let net = ab_net();
        let outcome = replay_trace(&net, ["a", "b"]);
        assert!(outcome.is_fitting());
        assert_eq!(outcome.fired, 2);
        assert_eq!(net.get_tokens(PlaceID(1)), 1);
        assert_eq!(net.get_tokens(PlaceID(3)), 0);
    }

    #[test]
    fn replay_reports_stuck_position() {
        let net = ab_net();
        let outcome = replay_trace(&net, ["a", "a"]);
        assert_eq!(
            outcome,
            ReplayOutcome {
                fired: 1,
                stuck_at: Some(1),
                reached_final_marking: false
            }
        );
        // Incomplete trace: no stuck position, but final marking not reached
        let outcome = replay_trace(&net, ["a"]);
        assert_eq!(outcome.stuck_at, None);
        assert!(!outcome.is_fitting());
    }

    #[test]
    fn replay_log_summary() {
        let net = ab_net();
        let log = EventLog::from_activity_traces(vec![
            ("1", vec!["a", "b"]),
            ("2", vec!["b"]),
            ("3", vec!["a", "b"]),
        ]);
        let summary = replay_log(&net, &log, ACTIVITY_NAME);
        assert_eq!(summary.fitting_cases, 2);
        assert_eq!(summary.non_fitting_cases, 1);
        assert_eq!(summary.non_fitting_case_ids, vec!["2".to_string()]);
        assert!((summary.fitness() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(
            replay_log(&net, &EventLog::new(), ACTIVITY_NAME).fitness(),
            1.0
        );
    }
}
