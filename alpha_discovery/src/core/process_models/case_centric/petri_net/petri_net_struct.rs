use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
/// Place ID
pub struct PlaceID(pub u64);

impl fmt::Display for PlaceID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
/// Transition ID
pub struct TransitionID(pub u64);

impl fmt::Display for TransitionID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Hash, Eq, PartialOrd, Ord)]
#[serde(tag = "type", content = "id")]
/// Endpoint of an edge: either a place or a transition
///
/// Edge direction is derived from the kinds of the two endpoints (see [`PetriNet::add_edge`]).
/// For interoperability with sign-encoded identifiers (places positive, transitions negative),
/// see [`NodeID::signed`] and the `TryFrom<i64>` implementation.
pub enum NodeID {
    /// A place
    Place(PlaceID),
    /// A transition
    Transition(TransitionID),
}

impl NodeID {
    /// Sign-encoded identifier: places are positive, transitions are negative
    pub fn signed(self) -> i64 {
        match self {
            NodeID::Place(p) => p.0 as i64,
            NodeID::Transition(t) => -(t.0 as i64),
        }
    }
}

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeID::Place(p) => write!(f, "place {}", p),
            NodeID::Transition(t) => write!(f, "transition {}", t),
        }
    }
}

impl From<PlaceID> for NodeID {
    fn from(value: PlaceID) -> Self {
        NodeID::Place(value)
    }
}

impl From<TransitionID> for NodeID {
    fn from(value: TransitionID) -> Self {
        NodeID::Transition(value)
    }
}

impl TryFrom<i64> for NodeID {
    type Error = PetriNetError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Err(PetriNetError::ZeroNodeId),
            v if v > 0 => Ok(NodeID::Place(PlaceID(v as u64))),
            v => Ok(NodeID::Transition(TransitionID(v.unsigned_abs()))),
        }
    }
}

/// Errors when constructing a [`PetriNet`]
///
/// All of these indicate a bug in the code building the net, not a runtime condition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetriNetError {
    /// Edge between two places or between two transitions
    #[error("Invalid edge from {from} to {to}: endpoints must be a place and a transition")]
    SameKindEndpoints {
        /// Edge source
        from: NodeID,
        /// Edge target
        to: NodeID,
    },
    /// Edge endpoint refers to a place not in the net
    #[error("Unknown place {0}")]
    UnknownPlace(PlaceID),
    /// Edge endpoint refers to a transition not in the net
    #[error("Unknown transition {0}")]
    UnknownTransition(TransitionID),
    /// No transition was registered for an activity referenced during net construction
    #[error("No transition registered for activity {0:?}")]
    UnknownActivity(String),
    /// Sign-encoded identifier 0 is neither a place nor a transition
    #[error("Node identifier 0 is neither a place nor a transition")]
    ZeroNodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
/// Transition in a Petri net
pub struct Transition {
    /// Transition name (activity label)
    pub name: String,
    /// Input places, in the order their edges were added
    pub inputs: Vec<PlaceID>,
    /// Output places, in the order their edges were added
    pub outputs: Vec<PlaceID>,
}

impl Transition {
    fn new(name: String) -> Self {
        Self {
            name,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Distinct input places
    pub fn preset(&self) -> BTreeSet<PlaceID> {
        self.inputs.iter().copied().collect()
    }

    /// Distinct output places
    pub fn postset(&self) -> BTreeSet<PlaceID> {
        self.outputs.iter().copied().collect()
    }
}

/// Marking of a Petri net: Assigning [`PlaceID`]s to a number of tokens
pub type Marking = BTreeMap<PlaceID, u64>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize, Serialize)]
///
/// A Petri net of places and [`Transition`]s
///
/// Places carry the current marking (their token count). Edges are stored on
/// the transitions as input and output place lists. Lookups of unknown
/// places or transitions return neutral defaults (0 tokens, not enabled, no-op)
/// instead of errors, so consumers can probe freely.
pub struct PetriNet {
    places: Marking,
    transitions: BTreeMap<TransitionID, Transition>,
    final_marking: Option<Marking>,
}

impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a place with 0 tokens
    ///
    /// Does nothing if the place already exists (its tokens are kept).
    pub fn add_place(&mut self, place_id: PlaceID) {
        self.places.entry(place_id).or_insert(0);
    }

    /// Add a transition with a name
    ///
    /// Does nothing if a transition with this ID already exists, even under another name.
    pub fn add_transition(&mut self, name: impl Into<String>, transition_id: TransitionID) {
        self.transitions
            .entry(transition_id)
            .or_insert_with(|| Transition::new(name.into()));
    }

    /// Add an edge between a place and a transition
    ///
    /// * place → transition: the place becomes an input of the transition
    /// * transition → place: the place becomes an output of the transition
    ///
    /// Both endpoints must exist and be of different kinds.
    pub fn add_edge(
        &mut self,
        from: impl Into<NodeID>,
        to: impl Into<NodeID>,
    ) -> Result<(), PetriNetError> {
        let (from, to) = (from.into(), to.into());
        match (from, to) {
            (NodeID::Place(p), NodeID::Transition(t)) => {
                if !self.places.contains_key(&p) {
                    return Err(PetriNetError::UnknownPlace(p));
                }
                self.transitions
                    .get_mut(&t)
                    .ok_or(PetriNetError::UnknownTransition(t))?
                    .inputs
                    .push(p);
            }
            (NodeID::Transition(t), NodeID::Place(p)) => {
                if !self.places.contains_key(&p) {
                    return Err(PetriNetError::UnknownPlace(p));
                }
                self.transitions
                    .get_mut(&t)
                    .ok_or(PetriNetError::UnknownTransition(t))?
                    .outputs
                    .push(p);
            }
            _ => return Err(PetriNetError::SameKindEndpoints { from, to }),
        }
        Ok(())
    }

    /// Add one token to a place (ignored for unknown places)
    pub fn add_marking(&mut self, place_id: PlaceID) {
        if let Some(tokens) = self.places.get_mut(&place_id) {
            *tokens += 1;
        }
    }

    /// Number of tokens in a place (0 for unknown places)
    pub fn get_tokens(&self, place_id: PlaceID) -> u64 {
        self.places.get(&place_id).copied().unwrap_or(0)
    }

    /// Check if a transition exists and all of its input places hold a token
    pub fn is_enabled(&self, transition_id: TransitionID) -> bool {
        match self.transitions.get(&transition_id) {
            Some(t) => t.inputs.iter().all(|p| self.get_tokens(*p) > 0),
            None => false,
        }
    }

    /// Fire a transition if it is enabled
    ///
    /// Consumes one token from every distinct input place and produces one token
    /// in every distinct output place. Returns whether the transition fired; a
    /// disabled or unknown transition leaves the marking untouched.
    pub fn fire_transition(&mut self, transition_id: TransitionID) -> bool {
        if !self.is_enabled(transition_id) {
            return false;
        }
        let Some(transition) = self.transitions.get(&transition_id) else {
            return false;
        };
        for p in transition.preset() {
            if let Some(tokens) = self.places.get_mut(&p) {
                *tokens -= 1;
            }
        }
        for p in transition.postset() {
            if let Some(tokens) = self.places.get_mut(&p) {
                *tokens += 1;
            }
        }
        true
    }

    /// Find a transition by name
    ///
    /// _Complexity_: Does linear lookup (i.e., in O(n)).
    pub fn transition_name_to_id(&self, name: &str) -> Option<TransitionID> {
        self.transitions
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(id, _)| *id)
    }

    /// Get a transition by ID
    pub fn transition(&self, transition_id: TransitionID) -> Option<&Transition> {
        self.transitions.get(&transition_id)
    }

    /// Name of a transition
    pub fn transition_name(&self, transition_id: TransitionID) -> Option<&str> {
        self.transitions
            .get(&transition_id)
            .map(|t| t.name.as_str())
    }

    /// All transitions, ordered by ID
    pub fn transitions(&self) -> &BTreeMap<TransitionID, Transition> {
        &self.transitions
    }

    /// All place IDs, in order
    pub fn places(&self) -> impl Iterator<Item = PlaceID> + '_ {
        self.places.keys().copied()
    }

    /// Check if a place is part of the net
    pub fn contains_place(&self, place_id: PlaceID) -> bool {
        self.places.contains_key(&place_id)
    }

    /// Number of places
    pub fn num_places(&self) -> usize {
        self.places.len()
    }

    /// Number of transitions
    pub fn num_transitions(&self) -> usize {
        self.transitions.len()
    }

    /// Number of edges (duplicate edges are counted individually)
    pub fn num_edges(&self) -> usize {
        self.transitions
            .values()
            .map(|t| t.inputs.len() + t.outputs.len())
            .sum()
    }

    /// Snapshot of the current marking (all places, including empty ones)
    pub fn marking(&self) -> Marking {
        self.places.clone()
    }

    /// Sum of tokens over all places
    pub fn total_tokens(&self) -> u64 {
        self.places.values().sum()
    }

    /// Get the distinct input places of a transition
    pub fn preset_of_transition(&self, transition_id: TransitionID) -> Vec<PlaceID> {
        self.transitions
            .get(&transition_id)
            .map(|t| t.preset().into_iter().collect())
            .unwrap_or_default()
    }

    /// Get the distinct output places of a transition
    pub fn postset_of_transition(&self, transition_id: TransitionID) -> Vec<PlaceID> {
        self.transitions
            .get(&transition_id)
            .map(|t| t.postset().into_iter().collect())
            .unwrap_or_default()
    }

    /// Get the transitions producing into a place
    pub fn preset_of_place(&self, place_id: PlaceID) -> Vec<TransitionID> {
        self.transitions
            .iter()
            .filter(|(_, t)| t.outputs.contains(&place_id))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Get the transitions consuming from a place
    pub fn postset_of_place(&self, place_id: PlaceID) -> Vec<TransitionID> {
        self.transitions
            .iter()
            .filter(|(_, t)| t.inputs.contains(&place_id))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Final marking, if one was recorded
    pub fn final_marking(&self) -> Option<&Marking> {
        self.final_marking.as_ref()
    }

    /// Record the final marking of this net
    pub fn set_final_marking(&mut self, marking: Marking) {
        self.final_marking = Some(marking);
    }

    /// Check if the current marking equals the final marking
    ///
    /// Places not mentioned in the final marking must be empty. Returns `false` if no final marking is recorded.
    pub fn is_in_final_marking(&self) -> bool {
        match &self.final_marking {
            Some(fm) => {
                self.places
                    .iter()
                    .all(|(p, tokens)| *tokens == fm.get(p).copied().unwrap_or(0))
                    && fm.keys().all(|p| self.places.contains_key(p))
            }
            None => false,
        }
    }
}
