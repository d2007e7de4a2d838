//! Common Games Backend Server
//!
//! Provides:
//! - REST API for common multiplayer game lookups
//! - WebSocket API for progressive result streaming
//! - Periodically refreshed cache of Multiplayer-tagged games

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use common_games_backend::cache::{self, MultiplayerCache};
use common_games_backend::service::SteamService;
use common_games_backend::steam_api::SteamClient;
use common_games_backend::steamspy::SteamSpyClient;
use common_games_backend::{routes, ws_handler, AppState};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,common_games_backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let steam_api_key = std::env::var("STEAM_API_KEY").ok();
    if steam_api_key.is_none() {
        tracing::warn!("STEAM_API_KEY not set - profile resolution and library lookups will fail");
    }

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client");

    let steam = Arc::new(SteamClient::new(http.clone(), steam_api_key));
    let spy = Arc::new(SteamSpyClient::new(http));

    // The first cache build starts right away; early requests await it
    // instead of failing.
    let multiplayer_cache = Arc::new(MultiplayerCache::new());
    let refresh_task = cache::spawn_refresh(multiplayer_cache.clone(), spy);

    let state = Arc::new(AppState {
        service: SteamService::new(steam, multiplayer_cache),
    });

    // Build router
    let app = Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        // WebSocket endpoint
        .route("/ws", get(ws_handler::ws_handler))
        // REST API
        .route(
            "/api/steam/common-multiplayer-games",
            post(routes::common_multiplayer_games),
        )
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();

    // The refresh timer dies with the server.
    refresh_task.abort();
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
