use std::time::{Duration, Instant};

use arena_client::bot::WanderBot;
use arena_client::connection::{NetEvent, ServerConnection};
use arena_client::engine::LocalEngine;
use arena_client::error::EngineError;
use arena_shared::config::ArenaConfig;
use tracing_subscriber::EnvFilter;

const DEFAULT_WS_URL: &str = "ws://127.0.0.1:3000/ws";
const FRAME_INTERVAL: Duration = Duration::from_micros(16_667);
const GRAVITY_PREVIEW_EVERY: u64 = 300;
const STATUS_EVERY: u64 = 600;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let ws_url = std::env::var("ARENA_WS_URL").unwrap_or_else(|_| DEFAULT_WS_URL.to_string());
    match url::Url::parse(&ws_url) {
        Ok(parsed) if matches!(parsed.scheme(), "ws" | "wss") => {}
        Ok(parsed) => {
            tracing::error!("ARENA_WS_URL must be ws:// or wss://, got {}://", parsed.scheme());
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!("Invalid ARENA_WS_URL {}: {}", ws_url, e);
            std::process::exit(1);
        }
    }

    let max_frames: Option<u64> = std::env::var("ARENA_BOT_FRAMES")
        .ok()
        .and_then(|s| s.parse().ok());
    let seed: u64 = std::env::var("ARENA_BOT_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);

    tracing::info!("Arena bot connecting to {} (seed {})", ws_url, seed);

    let connection = ServerConnection::new(ws_url);
    let mut engine = LocalEngine::new(ArenaConfig::default());
    let mut bot = WanderBot::new(seed);
    let mut frame_count: u64 = 0;

    loop {
        let frame_start = Instant::now();

        for event in connection.poll_events() {
            match event {
                NetEvent::Connected => {}
                NetEvent::Disconnected => {
                    engine.reset();
                    bot.reset();
                }
                NetEvent::Message(msg) => {
                    if let Err(e) = engine.handle_server_msg(msg) {
                        tracing::warn!("Dropped server message: {}", e);
                    }
                }
                NetEvent::ProtocolMismatch { server, client } => {
                    tracing::error!("Server speaks protocol {}, bot speaks {}", server, client);
                    std::process::exit(1);
                }
            }
        }

        if engine.local_id().is_some() {
            for input in bot.next_inputs() {
                if let Err(e) = engine.handle_input(input) {
                    tracing::warn!("Input dropped: {}", e);
                }
            }

            match engine.frame() {
                Ok(frame) => {
                    connection.send(frame.outbound);
                    if frame_count % STATUS_EVERY == 0 {
                        if let Ok(me) = engine.local() {
                            tracing::info!(
                                "Frame {}: {} participants, at ({:.1}, {:.1}) facing {:?}",
                                frame_count,
                                frame.sprites.len(),
                                me.position.x,
                                me.position.y,
                                me.facing
                            );
                        }
                    }
                }
                Err(EngineError::NotJoined) => {}
                Err(e) => tracing::warn!("Frame skipped: {}", e),
            }

            if frame_count % GRAVITY_PREVIEW_EVERY == 0 {
                if let Ok(request) = engine.gravity_preview_request() {
                    connection.send(request);
                }
                if let Some(preview) = engine.last_gravity_preview() {
                    tracing::debug!("Last gravity preview: {:?}", preview);
                }
            }

            frame_count += 1;
            if max_frames.is_some_and(|max| frame_count >= max) {
                tracing::info!("Ran {} frames, exiting", frame_count);
                break;
            }
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME_INTERVAL {
            std::thread::sleep(FRAME_INTERVAL - elapsed);
        }
    }
}
