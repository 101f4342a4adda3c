use arena_shared::participant::{ParticipantId, ParticipantState};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// First sighting of this id
    Inserted,
    /// Newer version replaced the stored one
    Applied,
    /// Version not newer than what is stored, dropped
    Stale,
}

/// Client-side copy of every known participant, keyed by id.
#[derive(Debug, Default, Clone)]
pub struct Mirror {
    entries: BTreeMap<ParticipantId, ParticipantState>,
}

impl Mirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge an inbound update.
    ///
    /// A newer version restarts the interpolation segment from where the
    /// entry is currently drawn, so bursts of updates never make it jump.
    pub fn merge(&mut self, incoming: ParticipantState) -> MergeOutcome {
        let Some(stored) = self.entries.get_mut(&incoming.id) else {
            self.entries.insert(incoming.id.clone(), incoming);
            return MergeOutcome::Inserted;
        };

        if incoming.version <= stored.version {
            return MergeOutcome::Stale;
        }

        stored.version = incoming.version;
        stored.previous_position = stored.position;
        stored.target_position = incoming.position;
        stored.interpolation_progress = 0.0;
        stored.intent = incoming.intent;
        stored.facing = incoming.facing;
        stored.fall_velocity = incoming.fall_velocity;
        MergeOutcome::Applied
    }

    /// Insert or replace without a version check. Used for the local entry.
    pub fn insert(&mut self, state: ParticipantState) {
        self.entries.insert(state.id.clone(), state);
    }

    pub fn remove(&mut self, id: &ParticipantId) -> Option<ParticipantState> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&ParticipantState> {
        self.entries.get(id)
    }

    pub fn get_mut(&mut self, id: &ParticipantId) -> Option<&mut ParticipantState> {
        self.entries.get_mut(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParticipantState> {
        self.entries.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParticipantState> {
        self.entries.values_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
