//! relay-gateway server entry point.
//!
//! Starts the Axum HTTP server with the WebSocket chat endpoint and the
//! health check.

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::get;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use relay_gateway::api;
use relay_gateway::app_state::AppState;
use relay_gateway::config::GatewayConfig;
use relay_gateway::domain::SessionRegistry;
use relay_gateway::persistence::PostgresStore;
use relay_gateway::service::ChatService;
use relay_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env().map_err(|e| anyhow::anyhow!(e.to_string()))?;
    tracing::info!(addr = %config.listen_addr, "starting relay-gateway");

    // Connect the store and bootstrap the schema
    let store = PostgresStore::connect(&config).await?;
    store.ensure_schema().await?;

    // Build domain + service layers
    let registry = Arc::new(SessionRegistry::new());
    let chat_service = Arc::new(ChatService::new(store, registry));

    let app_state = AppState { chat_service };

    // Build router
    let app = Router::new()
        .merge(api::routes())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config))
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Builds the CORS layer from `ALLOWED_ORIGINS`: permissive for the
/// wildcard, an explicit origin list otherwise. Origins that fail to parse
/// as header values are skipped with a warning.
fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    match config.origin_list() {
        None => CorsLayer::permissive(),
        Some(origins) => {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        tracing::warn!(%origin, "skipping unparseable allowed origin");
                        None
                    }
                })
                .collect();
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}
