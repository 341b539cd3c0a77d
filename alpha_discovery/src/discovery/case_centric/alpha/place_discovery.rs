use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::relations::{are_independent, ActivityPair, Footprint};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
/// Place candidate `(A, B)`: Every activity in `A` feeds every activity in `B` through this place
pub struct CandidatePlace {
    /// Input activities (`A`)
    pub inputs: BTreeSet<String>,
    /// Output activities (`B`)
    pub outputs: BTreeSet<String>,
}

impl CandidatePlace {
    /// Minimal candidate `({a}, {b})` for a causal pair
    pub fn from_causal_pair(a: &str, b: &str) -> Self {
        Self {
            inputs: BTreeSet::from([a.to_string()]),
            outputs: BTreeSet::from([b.to_string()]),
        }
    }

    /// Both components of `self` are subsets of the respective components of `other`
    pub fn is_covered_by(&self, other: &CandidatePlace) -> bool {
        self.inputs.is_subset(&other.inputs) && self.outputs.is_subset(&other.outputs)
    }

    /// Try merging `other` into this candidate
    ///
    /// * Same inputs and outputs of both independent: Union of outputs
    /// * Otherwise, same outputs and inputs of both independent: Union of inputs
    ///
    /// Only the two groups being combined are checked for independence, not all pairs
    /// within the resulting union.
    fn merged_with(
        &self,
        other: &CandidatePlace,
        independent: &BTreeSet<ActivityPair>,
    ) -> Option<CandidatePlace> {
        if self.inputs == other.inputs && are_independent(independent, &self.outputs, &other.outputs)
        {
            return Some(CandidatePlace {
                inputs: self.inputs.clone(),
                outputs: self.outputs.union(&other.outputs).cloned().collect(),
            });
        }
        if self.outputs == other.outputs && are_independent(independent, &self.inputs, &other.inputs)
        {
            return Some(CandidatePlace {
                inputs: self.inputs.union(&other.inputs).cloned().collect(),
                outputs: self.outputs.clone(),
            });
        }
        None
    }
}

impl fmt::Display for CandidatePlace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?} => {:?})", self.inputs, self.outputs)
    }
}

/// Minimal place candidates, one per causal pair (in the order of `causal`)
pub fn seed_candidates(causal: &BTreeSet<ActivityPair>) -> Vec<CandidatePlace> {
    causal
        .iter()
        .map(|(a, b)| CandidatePlace::from_causal_pair(a, b))
        .collect()
}

/// Greedily merge candidates until a full pass over all pairs yields no merge
///
/// For each `i`, every later candidate `j` is tried against candidate `i`. On a merge, `j` is
/// removed and `i` is replaced by the merged candidate; the scan continues with the updated `i`.
/// The result depends on the order of `cnds`.
pub fn merge_candidates(
    mut cnds: Vec<CandidatePlace>,
    independent: &BTreeSet<ActivityPair>,
) -> Vec<CandidatePlace> {
    let mut merged = true;
    let mut passes = 0;
    while merged {
        merged = false;
        passes += 1;
        let mut i = 0;
        while i < cnds.len() {
            let mut j = i + 1;
            while j < cnds.len() {
                match cnds[i].merged_with(&cnds[j], independent) {
                    Some(m) => {
                        cnds.remove(j);
                        cnds[i] = m;
                        merged = true;
                    }
                    None => j += 1,
                }
            }
            i += 1;
        }
    }
    log::trace!("Merging took {} pass(es)", passes);
    cnds
}

/// Keep only candidates not covered by a different candidate
///
/// Equal copies are not compared against each other, so duplicates are all kept.
pub fn filter_maximal(cnds: &[CandidatePlace]) -> Vec<CandidatePlace> {
    cnds.iter()
        .filter(|c1| !cnds.iter().any(|c2| c1 != &c2 && c1.is_covered_by(c2)))
        .cloned()
        .collect()
}

/// Discover the places of the Alpha algorithm
///
/// Seeds one candidate per causal pair, merges candidates with independent sides and keeps
/// the maximal ones.
pub fn discover_places(
    causal: &BTreeSet<ActivityPair>,
    independent: &BTreeSet<ActivityPair>,
) -> Vec<CandidatePlace> {
    let seeds = seed_candidates(causal);
    log::debug!("Built {} candidate seeds", seeds.len());
    let merged = merge_candidates(seeds, independent);
    log::debug!("{} candidates after merging", merged.len());
    let maximal = filter_maximal(&merged);
    log::debug!("Kept {} maximal places", maximal.len());
    maximal
}

impl Footprint {
    /// Discover the places of the Alpha algorithm for this footprint
    ///
    /// See [`discover_places`].
    pub fn discover_places(&self) -> Vec<CandidatePlace> {
        discover_places(&self.causal, &self.independent)
    }
}
