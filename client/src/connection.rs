use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use arena_shared::protocol::{ClientMsg, ServerMsg, PROTOCOL_VERSION};

const INITIAL_RECONNECT_DELAY: Duration = Duration::from_millis(1000);
const MAX_RECONNECT_DELAY: Duration = Duration::from_millis(30_000);

#[derive(Debug, Clone, PartialEq)]
pub enum NetEvent {
    Connected,
    Disconnected,
    Message(ServerMsg),
    ProtocolMismatch { server: u32, client: u32 },
}

type CmdSender = tokio::sync::mpsc::UnboundedSender<ClientMsg>;

/// WebSocket link to the room, driven from a background thread.
///
/// The render loop polls events without blocking and queues outbound
/// messages; the network thread owns the socket and reconnects with
/// backoff when it drops.
pub struct ServerConnection {
    event_rx: Receiver<NetEvent>,
    cmd_tx: CmdSender,
}

impl ServerConnection {
    pub fn new(url: String) -> Self {
        let (event_tx, event_rx) = mpsc::channel::<NetEvent>();
        let cmd_tx = spawn_network_thread(url, event_tx);

        Self { event_rx, cmd_tx }
    }

    /// Drain every event received since the last poll.
    pub fn poll_events(&self) -> Vec<NetEvent> {
        self.event_rx.try_iter().collect()
    }

    /// Queue a message. Dropped silently if the network thread is gone.
    pub fn send(&self, msg: ClientMsg) {
        let _ = self.cmd_tx.send(msg);
    }
}

fn spawn_network_thread(url: String, event_tx: Sender<NetEvent>) -> CmdSender {
    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;

    let (cmd_tx, mut cmd_rx) = tokio::sync::mpsc::unbounded_channel::<ClientMsg>();

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to build network runtime: {}", e);
                let _ = event_tx.send(NetEvent::Disconnected);
                return;
            }
        };

        rt.block_on(async move {
            let mut reconnect_delay = INITIAL_RECONNECT_DELAY;

            loop {
                let (ws_stream, _) = match tokio_tungstenite::connect_async(url.as_str()).await {
                    Ok(x) => x,
                    Err(e) => {
                        tracing::debug!("Connect to {} failed: {}", url, e);
                        tokio::time::sleep(reconnect_delay).await;
                        reconnect_delay = reconnect_delay.mul_f32(1.5).min(MAX_RECONNECT_DELAY);
                        continue;
                    }
                };

                // Updates queued while offline describe a session that no longer exists.
                while cmd_rx.try_recv().is_ok() {}

                reconnect_delay = INITIAL_RECONNECT_DELAY;
                tracing::info!("Connected to {}", url);
                let _ = event_tx.send(NetEvent::Connected);

                let (mut write, mut read) = ws_stream.split();

                loop {
                    tokio::select! {
                        biased;

                        cmd = cmd_rx.recv() => {
                            // Every ServerConnection handle dropped.
                            let Some(cmd) = cmd else { return };
                            if let Ok(text) = serde_json::to_string(&cmd) {
                                if write.send(Message::Text(text.into())).await.is_err() {
                                    break;
                                }
                            }
                        }

                        msg = read.next() => {
                            match msg {
                                Some(Ok(Message::Text(txt))) => {
                                    let Ok(server_msg) = serde_json::from_str::<ServerMsg>(&txt) else {
                                        tracing::debug!("Ignoring unparseable server frame");
                                        continue;
                                    };
                                    if let ServerMsg::Joined(joined) = &server_msg {
                                        if joined.protocol_version != PROTOCOL_VERSION {
                                            tracing::error!(
                                                "Protocol mismatch: server {}, client {}",
                                                joined.protocol_version,
                                                PROTOCOL_VERSION
                                            );
                                            let _ = event_tx.send(NetEvent::ProtocolMismatch {
                                                server: joined.protocol_version,
                                                client: PROTOCOL_VERSION,
                                            });
                                            let _ = write.close().await;
                                            break;
                                        }
                                    }
                                    let _ = event_tx.send(NetEvent::Message(server_msg));
                                }
                                Some(Ok(Message::Close(_))) | None => break,
                                Some(Ok(_)) => {}
                                Some(Err(e)) => {
                                    tracing::debug!("Socket error: {}", e);
                                    break;
                                }
                            }
                        }
                    }
                }

                tracing::info!("Disconnected from {}", url);
                let _ = event_tx.send(NetEvent::Disconnected);
                tokio::time::sleep(reconnect_delay).await;
                reconnect_delay = reconnect_delay.mul_f32(1.5).min(MAX_RECONNECT_DELAY);
            }
        });
    });

    cmd_tx
}
