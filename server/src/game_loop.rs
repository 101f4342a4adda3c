use crate::config::ServerConfig;
use crate::participant::ConnectionId;
use crate::state::RoomState;
use arena_shared::participant::{ParticipantId, ParticipantState};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

/// Commands from client connections to the room loop
pub enum RoomCommand {
    Join {
        connection: ConnectionId,
        response: oneshot::Sender<ParticipantState>,
    },
    MovementUpdate {
        id: ParticipantId,
        state: Box<ParticipantState>,
    },
    Leave {
        id: ParticipantId,
    },
}

/// Broadcasts from the room loop to every connection
#[derive(Debug, Clone)]
pub enum RoomBroadcast {
    /// Relayed to every connection except `from`
    UpdatedMovement {
        from: ParticipantId,
        state: ParticipantState,
    },
    Left {
        id: ParticipantId,
    },
    GravityTick,
}

/// Run the room loop. Owns the registry.
///
/// All fan-out goes through the broadcast channel, so each send reaches
/// exactly the connections subscribed at that moment; a disconnect racing a
/// tick only ever drops that one receiver.
pub async fn run_room_loop(
    mut cmd_rx: mpsc::Receiver<RoomCommand>,
    broadcast_tx: broadcast::Sender<RoomBroadcast>,
    config: ServerConfig,
) {
    let mut room = RoomState::new(config.room.clone());

    let mut gravity_interval = tokio::time::interval(Duration::from_millis(config.gravity_tick_ms));
    gravity_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = gravity_interval.tick() => {
                // No receivers is fine, the room may be empty.
                let _ = broadcast_tx.send(RoomBroadcast::GravityTick);
            }

            cmd = cmd_rx.recv() => {
                // Every connection handle dropped: the server is shutting down.
                let Some(cmd) = cmd else { break };
                match cmd {
                    RoomCommand::Join { connection, response } => {
                        let state = room.join(connection);
                        tracing::info!(
                            "Participant {} joined {} ({} present)",
                            state.id,
                            room.name,
                            room.len()
                        );
                        let _ = response.send(state);
                    }
                    RoomCommand::MovementUpdate { id, state } => {
                        match room.apply_movement(&id, *state) {
                            Some(stamped) => {
                                let _ = broadcast_tx.send(RoomBroadcast::UpdatedMovement {
                                    from: id,
                                    state: stamped,
                                });
                            }
                            None => tracing::debug!("Dropped movement from departed {}", id),
                        }
                    }
                    RoomCommand::Leave { id } => {
                        if room.leave(&id) {
                            let _ = broadcast_tx.send(RoomBroadcast::Left { id: id.clone() });
                            tracing::info!("Participant {} left ({} present)", id, room.len());
                        }
                    }
                }
            }
        }
    }

    tracing::info!("Room loop ended");
}
