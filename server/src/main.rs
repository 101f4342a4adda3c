use arena_server::config::ServerConfig;
use arena_server::game_loop::{run_room_loop, RoomBroadcast, RoomCommand};
use arena_server::ws::{router, AppState};
use tokio::sync::{broadcast, mpsc};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env();

    // Validate configuration before starting
    if let Err(e) = config.validate() {
        tracing::error!("Invalid server configuration: {}", e);
        std::process::exit(1);
    }

    let (room_tx, room_rx) = mpsc::channel::<RoomCommand>(config.command_capacity);
    let (broadcast_tx, _) = broadcast::channel::<RoomBroadcast>(config.broadcast_capacity);

    let app_state = AppState::new(&config, room_tx, broadcast_tx.clone());

    // Spawn room loop
    let room_config = config.clone();
    tokio::spawn(async move {
        run_room_loop(room_rx, broadcast_tx, room_config).await;
    });

    let app = router(app_state).layer(CorsLayer::permissive());

    let listener = match tokio::net::TcpListener::bind(&config.listen_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", config.listen_addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Arena server listening on {} (room {}, gravity tick {}ms)",
        config.listen_addr,
        config.room,
        config.gravity_tick_ms
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
