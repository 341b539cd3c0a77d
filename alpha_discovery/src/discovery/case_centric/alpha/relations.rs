use std::collections::BTreeSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::core::event_data::case_centric::EventLog;

/// Ordered pair of activity labels
pub type ActivityPair = (String, String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Footprint relation between an ordered pair `(a, b)` of distinct activities
///
/// For every such pair exactly one variant holds.
pub enum Relation {
    /// `a -> b`: `b` directly follows `a`, but never the other way around
    Causal,
    /// `a <- b`: `a` directly follows `b`, but never the other way around
    InverseCausal,
    /// `a || b`: both directly follow each other
    Parallel,
    /// `a # b`: neither directly follows the other
    Independent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
///
/// Footprint of an event log: Activities and the ordering relations between them
///
/// All relations are derived from directly-follows pairs only (no frequencies).
///
pub struct Footprint {
    /// All activities occurring in the log
    pub activities: BTreeSet<String>,
    /// Activities of first events of cases
    pub start_activities: BTreeSet<String>,
    /// Activities of last events of cases
    pub end_activities: BTreeSet<String>,
    /// `(a, b)` such that `b` directly follows `a` in some case
    pub direct_succession: BTreeSet<ActivityPair>,
    /// `(a, b)` with `a -> b`
    pub causal: BTreeSet<ActivityPair>,
    /// `(a, b)` with `a || b` (contains both orderings)
    pub parallel: BTreeSet<ActivityPair>,
    /// `(a, b)` with `a # b` and `a != b` (contains both orderings)
    pub independent: BTreeSet<ActivityPair>,
}

impl Footprint {
    /// Compute the footprint of an [`EventLog`], reading activities from `activity_key`
    pub fn from_event_log(log: &EventLog, activity_key: &str) -> Self {
        Self::from_activity_traces(log.activity_traces(activity_key))
    }

    /// Compute the footprint from plain activity sequences
    pub fn from_activity_traces<I, T, S>(traces: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ret = Self::default();
        for trace in traces {
            let trace: Vec<String> = trace.into_iter().map(|a| a.as_ref().to_string()).collect();
            if let Some(first) = trace.first() {
                ret.start_activities.insert(first.clone());
            }
            if let Some(last) = trace.last() {
                ret.end_activities.insert(last.clone());
            }
            for (a, b) in trace.iter().tuple_windows() {
                ret.direct_succession.insert((a.clone(), b.clone()));
            }
            ret.activities.extend(trace);
        }
        ret.derive_relations();
        ret
    }

    fn derive_relations(&mut self) {
        for (a, b) in self.activities.iter().cartesian_product(self.activities.iter()) {
            if a == b {
                continue;
            }
            let ab = self.follows(a, b);
            let ba = self.follows(b, a);
            let pair = (a.clone(), b.clone());
            match (ab, ba) {
                (true, false) => {
                    self.causal.insert(pair);
                }
                (true, true) => {
                    self.parallel.insert(pair);
                }
                (false, false) => {
                    self.independent.insert(pair);
                }
                // Recorded as causal when visiting (b, a)
                (false, true) => {}
            }
        }
    }

    fn follows(&self, a: &str, b: &str) -> bool {
        self.direct_succession
            .contains(&(a.to_string(), b.to_string()))
    }

    /// Relation between two distinct, known activities
    ///
    /// Returns `None` if `a == b` or one of them does not occur in the log.
    pub fn relation_between(&self, a: &str, b: &str) -> Option<Relation> {
        if a == b || !self.activities.contains(a) || !self.activities.contains(b) {
            return None;
        }
        let pair = (a.to_string(), b.to_string());
        if self.causal.contains(&pair) {
            Some(Relation::Causal)
        } else if self.parallel.contains(&pair) {
            Some(Relation::Parallel)
        } else if self.independent.contains(&pair) {
            Some(Relation::Independent)
        } else {
            Some(Relation::InverseCausal)
        }
    }

    /// Check that every activity in `set1` is independent of every activity in `set2`
    pub fn are_independent<'a, I1, I2>(&self, set1: I1, set2: I2) -> bool
    where
        I1: IntoIterator<Item = &'a String>,
        I2: IntoIterator<Item = &'a String>,
        I2::IntoIter: Clone,
    {
        are_independent(&self.independent, set1, set2)
    }
}

/// Check that every pair in the cross product of `set1` and `set2` is contained in `independent`
pub fn are_independent<'a, I1, I2>(independent: &BTreeSet<ActivityPair>, set1: I1, set2: I2) -> bool
where
    I1: IntoIterator<Item = &'a String>,
    I2: IntoIterator<Item = &'a String>,
    I2::IntoIter: Clone,
{
    set1.into_iter()
        .cartesian_product(set2)
        .all(|(a, b)| independent.contains(&(a.clone(), b.clone())))
}
