use crate::participant::{allocate_participant_id, ConnectionId};
use arena_shared::participant::{ParticipantId, ParticipantState};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

/// Relay-side version source.
///
/// Stamps are wall-clock milliseconds, bumped past the previous stamp when the
/// clock stalls or steps backwards, so every stamp is strictly greater than
/// the last one handed out.
#[derive(Debug, Default)]
pub struct RelayClock {
    last: u64,
}

impl RelayClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stamp(&mut self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.last = now.max(self.last + 1);
        self.last
    }
}

/// Canonical room membership, owned by the room loop task.
pub struct RoomState {
    pub name: String,
    participants: HashMap<ParticipantId, ParticipantState>,
    clock: RelayClock,
}

impl RoomState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            participants: HashMap::new(),
            clock: RelayClock::new(),
        }
    }

    /// Allocate a fresh participant for a new connection.
    pub fn join(&mut self, connection: ConnectionId) -> ParticipantState {
        let mut id = allocate_participant_id(connection);
        while self.participants.contains_key(&id) {
            id = allocate_participant_id(connection);
        }
        let state = ParticipantState::new(id.clone(), self.clock.stamp());
        self.participants.insert(id, state.clone());
        state
    }

    /// Overwrite `id`'s entry with the sender's copy and stamp it.
    ///
    /// The id inside `state` is replaced with `id`: a connection only ever
    /// writes its own entry. Returns the stamped copy to relay, or `None` when
    /// `id` already left.
    pub fn apply_movement(
        &mut self,
        id: &ParticipantId,
        mut state: ParticipantState,
    ) -> Option<ParticipantState> {
        let stamp = self.clock.stamp();
        let entry = self.participants.get_mut(id)?;
        state.id = id.clone();
        state.version = stamp;
        *entry = state.clone();
        Some(state)
    }

    /// Remove a participant. Returns false if it was already gone.
    pub fn leave(&mut self, id: &ParticipantId) -> bool {
        self.participants.remove(id).is_some()
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&ParticipantState> {
        self.participants.get(id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_shared::participant::Position;

    fn test_room() -> RoomState {
        RoomState::new("room1")
    }

    #[test]
    fn relay_clock_is_strictly_increasing() {
        let mut clock = RelayClock::new();
        let mut last = 0;
        for _ in 0..10_000 {
            let stamp = clock.stamp();
            assert!(stamp > last);
            last = stamp;
        }
    }

    #[test]
    fn join_allocates_zeroed_state() {
        let mut room = test_room();
        let state = room.join(ConnectionId(1));
        assert_eq!(state.position, Position::default());
        assert_eq!(state.target_position, Position::default());
        assert!(!state.intent.any());
        assert_eq!(state.animation_frame, 0);
        assert_eq!(room.len(), 1);
        assert_eq!(room.get(&state.id), Some(&state));
    }

    #[test]
    fn joins_get_unique_ids() {
        let mut room = test_room();
        let a = room.join(ConnectionId(1));
        let b = room.join(ConnectionId(1));
        assert_ne!(a.id, b.id);
        assert_eq!(room.len(), 2);
    }

    #[test]
    fn movement_overwrites_wholesale_and_restamps() {
        let mut room = test_room();
        let joined = room.join(ConnectionId(1));

        let mut update = joined.clone();
        update.version = 0; // client-supplied versions are ignored
        update.target_position = Position::new(40.0, 379.0);
        update.intent.moving_right = true;

        let relayed = room.apply_movement(&joined.id, update).unwrap();
        assert!(relayed.version > joined.version);
        assert_eq!(relayed.target_position, Position::new(40.0, 379.0));
        assert!(relayed.intent.moving_right);
        assert_eq!(room.get(&joined.id), Some(&relayed));
    }

    #[test]
    fn movement_cannot_write_another_entry() {
        let mut room = test_room();
        let a = room.join(ConnectionId(1));
        let b = room.join(ConnectionId(2));

        let mut forged = b.clone();
        forged.target_position = Position::new(300.0, 0.0);

        let relayed = room.apply_movement(&a.id, forged).unwrap();
        assert_eq!(relayed.id, a.id);
        assert_eq!(room.get(&b.id), Some(&b));
    }

    #[test]
    fn movement_after_leave_is_dropped() {
        let mut room = test_room();
        let a = room.join(ConnectionId(1));
        assert!(room.leave(&a.id));
        assert!(room.apply_movement(&a.id, a.clone()).is_none());
        assert!(room.is_empty());
    }

    #[test]
    fn leave_is_idempotent() {
        let mut room = test_room();
        let a = room.join(ConnectionId(1));
        assert!(room.leave(&a.id));
        assert!(!room.leave(&a.id));
        assert!(room.is_empty());
    }
}
