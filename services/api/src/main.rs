mod config;
mod protocol;
mod render;
mod socket;
mod stability_adapter;

use crate::config::Config;
use crate::stability_adapter::StabilityAdapter;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{State, ws::WebSocketUpgrade},
    response::{Html, Response},
    routing::get,
};
use minimi_core::assistant::Assistant;
use minimi_core::chat::ChatClient;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

const INDEX_HTML: &str = include_str!("../static/index.html");

#[derive(Clone)]
struct AppState {
    assistant: Arc<Assistant>,
}

/// Serves the single chat page.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health() -> &'static str {
    "ok"
}

/// Handles WebSocket upgrade requests.
///
/// Every upgraded connection gets a fresh session; nothing is shared between
/// connections except the stateless assistant.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    info!("WebSocket upgrade request received");
    ws.on_upgrade(move |stream| socket::handle_socket(stream, state.assistant))
}

fn build_assistant(config: Config) -> Assistant {
    let chat = ChatClient::new(config.chat_api_base, config.chat_api_key, config.chat_model);
    let images = StabilityAdapter::new(&config.stability_api_host, &config.stability_engine);
    Assistant::new(Arc::new(chat), Arc::new(images), config.stability_api_key)
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    info!(
        chat_api = %config.chat_api_base,
        model = %config.chat_model,
        "Configuration loaded successfully. Starting MiniMi..."
    );

    // --- 3. Wire the assistant ---
    let bind_address = config.bind_address;
    let state = AppState {
        assistant: Arc::new(build_assistant(config)),
    };
    if !state.assistant.has_image_credential() {
        tracing::warn!("STABILITY_API_KEY is not set; image requests will be refused");
    }

    // Permissive CORS so the page can also be served from elsewhere.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state);

    info!("Starting server, listening on {}", bind_address);
    let listener = tokio::net::TcpListener::bind(bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    axum::serve(listener, app).await?;

    Ok(())
}
