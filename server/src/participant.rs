use arena_shared::participant::ParticipantId;
use sha2::{Digest, Sha256};
use std::time::{SystemTime, UNIX_EPOCH};

/// Per-socket identity, drawn when the WebSocket upgrade completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(pub u64);

impl ConnectionId {
    pub fn random() -> Self {
        Self(rand::random())
    }
}

/// Derive a participant id from the connection and the current time.
///
/// The id is a truncated SHA-256 of both, so it stays unique across the
/// process lifetime without a counter that could reset.
pub fn allocate_participant_id(connection: ConnectionId) -> ParticipantId {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    participant_id_from(connection, nanos)
}

fn participant_id_from(connection: ConnectionId, nanos: u128) -> ParticipantId {
    let mut hasher = Sha256::new();
    hasher.update(connection.0.to_le_bytes());
    hasher.update(nanos.to_le_bytes());
    let digest = hasher.finalize();
    ParticipantId(hex::encode(&digest[..16]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn id_is_32_hex_chars() {
        let id = allocate_participant_id(ConnectionId(7));
        assert_eq!(id.as_str().len(), 32);
        assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn same_inputs_same_id() {
        let a = participant_id_from(ConnectionId(1), 1_000);
        let b = participant_id_from(ConnectionId(1), 1_000);
        assert_eq!(a, b);
    }

    #[test]
    fn connection_or_time_changes_id() {
        let base = participant_id_from(ConnectionId(1), 1_000);
        assert_ne!(base, participant_id_from(ConnectionId(2), 1_000));
        assert_ne!(base, participant_id_from(ConnectionId(1), 1_001));
    }

    #[test]
    fn many_allocations_do_not_collide() {
        let ids: HashSet<_> = (0..1000)
            .map(|_| allocate_participant_id(ConnectionId::random()))
            .collect();
        assert_eq!(ids.len(), 1000);
    }
}
