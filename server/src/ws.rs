use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::{Sink, SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc, oneshot};

use crate::config::ServerConfig;
use crate::game_loop::{RoomBroadcast, RoomCommand};
use crate::participant::ConnectionId;
use arena_shared::config::ArenaConfig;
use arena_shared::gravity::step_gravity;
use arena_shared::participant::ParticipantId;
use arena_shared::protocol::{
    CalculateGravityMsg, ClientMsg, GravUpdateMsg, JoinedMsg, LeftMsg, ServerMsg, PROTOCOL_VERSION,
};

/// Shared app state passed to each WebSocket handler
#[derive(Clone)]
pub struct AppState {
    pub room_tx: mpsc::Sender<RoomCommand>,
    pub broadcast_tx: broadcast::Sender<RoomBroadcast>,
    pub room: String,
    pub arena: ArenaConfig,
    pub max_message_bytes: usize,
    pub max_parse_errors: u32,
}

impl AppState {
    pub fn new(
        config: &ServerConfig,
        room_tx: mpsc::Sender<RoomCommand>,
        broadcast_tx: broadcast::Sender<RoomBroadcast>,
    ) -> Self {
        Self {
            room_tx,
            broadcast_tx,
            room: config.room.clone(),
            arena: config.arena,
            max_message_bytes: config.max_message_bytes,
            max_parse_errors: config.max_parse_errors,
        }
    }
}

/// Router exposing the room at `/ws`.
pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .with_state(app_state)
}

/// HTTP handler for WebSocket upgrade
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(app_state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, app_state))
}

/// Stateless preview of one gravity tick for the square in `req`.
pub fn preview_gravity(req: &CalculateGravityMsg, arena: &ArenaConfig) -> GravUpdateMsg {
    let step = step_gravity(req.square.target_position.y, req.grav_mult, arena);
    GravUpdateMsg {
        new_dest: step.new_dest,
        grav_multiplier: step.fall_speed,
        falling: step.falling,
    }
}

async fn handle_socket(socket: WebSocket, app_state: AppState) {
    let (mut sink, mut stream) = socket.split();
    let connection = ConnectionId::random();

    // Subscribe before joining so nothing relayed after `joined` is missed
    let mut broadcast_rx = app_state.broadcast_tx.subscribe();

    let (resp_tx, resp_rx) = oneshot::channel();
    if app_state
        .room_tx
        .send(RoomCommand::Join {
            connection,
            response: resp_tx,
        })
        .await
        .is_err()
    {
        tracing::error!("Failed to send Join command");
        return;
    }

    let me = match resp_rx.await {
        Ok(state) => state,
        Err(_) => {
            tracing::error!("Failed to receive joined state");
            return;
        }
    };
    let my_id = me.id.clone();

    tracing::info!("Participant {} connected", my_id);

    let joined = ServerMsg::Joined(JoinedMsg {
        protocol_version: PROTOCOL_VERSION,
        room: app_state.room.clone(),
        participant: me,
    });
    if send_msg(&mut sink, &joined).await.is_err() {
        leave(&app_state, my_id).await;
        return;
    }

    let mut parse_errors: u32 = 0;

    loop {
        tokio::select! {
            // Client -> Server
            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        if text.len() > app_state.max_message_bytes {
                            tracing::warn!(
                                "Participant {} sent {} byte frame, closing",
                                my_id,
                                text.len()
                            );
                            let _ = sink.send(Message::Close(None)).await;
                            break;
                        }
                        match serde_json::from_str::<ClientMsg>(&text) {
                            Ok(ClientMsg::MovementUpdate(state)) => {
                                let _ = app_state.room_tx.send(RoomCommand::MovementUpdate {
                                    id: my_id.clone(),
                                    state: Box::new(state),
                                }).await;
                            }
                            Ok(ClientMsg::CalculateGravity(req)) => {
                                let reply = ServerMsg::GravUpdate(preview_gravity(&req, &app_state.arena));
                                if send_msg(&mut sink, &reply).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => {
                                parse_errors += 1;
                                tracing::debug!("Participant {} sent bad frame: {}", my_id, e);
                                if parse_errors > app_state.max_parse_errors {
                                    tracing::warn!("Participant {} exceeded parse error limit, closing", my_id);
                                    let _ = sink.send(Message::Close(None)).await;
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!("Participant {} transport error: {}", my_id, e);
                        break;
                    }
                    _ => {} // Ignore ping/pong/binary
                }
            }

            // Server -> Client (broadcast)
            result = broadcast_rx.recv() => {
                match relay_action(result, &my_id) {
                    Relay::Send(msg) => {
                        if send_msg(&mut sink, &msg).await.is_err() {
                            break;
                        }
                    }
                    Relay::Skip => {}
                    Relay::Resync(n) => {
                        tracing::warn!(
                            "Participant {} lagged by {} messages, closing for resync",
                            my_id,
                            n
                        );
                        let _ = sink.send(Message::Close(None)).await;
                        break;
                    }
                    Relay::Closed => break,
                }
            }
        }
    }

    leave(&app_state, my_id).await;
}

/// What a connection does with one received broadcast.
#[derive(Debug, PartialEq)]
pub enum Relay {
    Send(ServerMsg),
    /// Not for this connection (its own movement)
    Skip,
    /// Broadcasts were dropped. A skipped `left` is never repeated, so the
    /// peer's mirror can only be repaired by a fresh session.
    Resync(u64),
    Closed,
}

pub fn relay_action(
    result: Result<RoomBroadcast, broadcast::error::RecvError>,
    my_id: &ParticipantId,
) -> Relay {
    match result {
        Ok(RoomBroadcast::UpdatedMovement { from, state }) => {
            if &from == my_id {
                return Relay::Skip; // Never echo to the sender
            }
            Relay::Send(ServerMsg::UpdatedMovement(state))
        }
        Ok(RoomBroadcast::Left { id }) => Relay::Send(ServerMsg::Left(LeftMsg { id })),
        Ok(RoomBroadcast::GravityTick) => Relay::Send(ServerMsg::GravityTick),
        Err(broadcast::error::RecvError::Lagged(n)) => Relay::Resync(n),
        Err(broadcast::error::RecvError::Closed) => Relay::Closed,
    }
}

async fn send_msg<S>(sink: &mut S, msg: &ServerMsg) -> Result<(), ()>
where
    S: Sink<Message> + Unpin,
{
    let json = serde_json::to_string(msg).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}

async fn leave(app_state: &AppState, id: ParticipantId) {
    tracing::info!("Participant {} disconnected", id);
    let _ = app_state.room_tx.send(RoomCommand::Leave { id }).await;
}
