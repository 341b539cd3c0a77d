use std::collections::{BTreeSet, HashMap};

use crate::core::process_models::case_centric::petri_net::{
    Marking, PetriNet, PetriNetError, PlaceID, TransitionID,
};

use super::place_discovery::CandidatePlace;

///
/// Builds a [`PetriNet`] from activities and discovered places
///
/// Owns the identifier counters for one net: Place and transition IDs are handed out
/// sequentially, starting at 1.
///
#[derive(Debug)]
pub struct NetSynthesizer {
    next_place: u64,
    next_transition: u64,
    net: PetriNet,
    act_to_transition: HashMap<String, TransitionID>,
}

impl Default for NetSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl NetSynthesizer {
    /// Create a synthesizer for a new, empty net
    pub fn new() -> Self {
        Self {
            next_place: 1,
            next_transition: 1,
            net: PetriNet::new(),
            act_to_transition: HashMap::new(),
        }
    }

    fn fresh_place(&mut self) -> PlaceID {
        let id = PlaceID(self.next_place);
        self.next_place += 1;
        self.net.add_place(id);
        id
    }

    fn fresh_transition(&mut self, name: &str) -> TransitionID {
        let id = TransitionID(self.next_transition);
        self.next_transition += 1;
        self.net.add_transition(name, id);
        id
    }

    fn transition_of(&self, activity: &str) -> Result<TransitionID, PetriNetError> {
        self.act_to_transition
            .get(activity)
            .copied()
            .ok_or_else(|| PetriNetError::UnknownActivity(activity.to_string()))
    }

    /// Register one transition per activity (in order), named after the activity
    ///
    /// Activities that already have a transition are skipped.
    pub fn add_activities<'a, I>(&mut self, activities: I)
    where
        I: IntoIterator<Item = &'a String>,
    {
        for act in activities {
            if !self.act_to_transition.contains_key(act) {
                let t = self.fresh_transition(act);
                self.act_to_transition.insert(act.clone(), t);
            }
        }
    }

    /// Add a place for a candidate, fed by the transitions of its inputs and feeding the transitions of its outputs
    pub fn add_candidate_place(
        &mut self,
        cnd: &CandidatePlace,
    ) -> Result<PlaceID, PetriNetError> {
        let place = self.fresh_place();
        for in_act in &cnd.inputs {
            let t = self.transition_of(in_act)?;
            self.net.add_edge(t, place)?;
        }
        for out_act in &cnd.outputs {
            let t = self.transition_of(out_act)?;
            self.net.add_edge(place, t)?;
        }
        Ok(place)
    }

    /// Add the start place (with one token) feeding the transitions of `start_activities`
    pub fn add_start_place<'a, I>(&mut self, start_activities: I) -> Result<PlaceID, PetriNetError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let place = self.fresh_place();
        self.net.add_marking(place);
        for act in start_activities {
            let t = self.transition_of(act)?;
            self.net.add_edge(place, t)?;
        }
        Ok(place)
    }

    /// Add the end place fed by the transitions of `end_activities`
    ///
    /// The final marking of the net is set to one token in this place.
    pub fn add_end_place<'a, I>(&mut self, end_activities: I) -> Result<PlaceID, PetriNetError>
    where
        I: IntoIterator<Item = &'a String>,
    {
        let place = self.fresh_place();
        for act in end_activities {
            let t = self.transition_of(act)?;
            self.net.add_edge(t, place)?;
        }
        self.net.set_final_marking(Marking::from([(place, 1)]));
        Ok(place)
    }

    /// Return the constructed net
    pub fn finish(self) -> PetriNet {
        self.net
    }

    /// Build the complete net
    ///
    /// Transitions for all `activities` first, then one place per candidate (in order),
    /// then the start and end place.
    pub fn synthesize(
        mut self,
        activities: &BTreeSet<String>,
        start_activities: &BTreeSet<String>,
        end_activities: &BTreeSet<String>,
        places: &[CandidatePlace],
    ) -> Result<PetriNet, PetriNetError> {
        self.add_activities(activities);
        for cnd in places {
            self.add_candidate_place(cnd)?;
        }
        self.add_start_place(start_activities)?;
        self.add_end_place(end_activities)?;
        Ok(self.finish())
    }
}
