use arena_shared::participant::ParticipantId;
use thiserror::Error;

/// Failures of operations that act on the local participant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("no `joined` received yet")]
    NotJoined,
    #[error("local participant {0} missing from mirror")]
    LocalParticipantMissing(ParticipantId),
    #[error("protocol mismatch: server {server}, client {client}")]
    ProtocolMismatch { server: u32, client: u32 },
}
