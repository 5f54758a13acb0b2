use std::{env, error::Error, sync::Arc};

pub mod core;
pub mod error_handler;
mod routes;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use ai_llm_service::LlmServiceProfiles;

use crate::core::app_state::{AppState, ServiceInfo};
use crate::routes::{
    chat::chat_route::chat, clear_route::clear, home_route::home, info_route::info,
    search::search_route::search,
};

pub use crate::core::telemetry::init_tracing;

/// Bind address used when `API_ADDRESS` is not set.
pub const DEFAULT_API_ADDRESS: &str = "127.0.0.1:8000";

/// Build the HTTP router over shared state; CORS allows any origin, method and header.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/chat", post(chat))
        .route("/clear", post(clear))
        .route("/search", get(search))
        .route("/info", get(info))
        .layer(cors)
        .with_state(state)
}

/// Wire the assistant from the environment and serve until Ctrl+C.
pub async fn start() -> Result<(), Box<dyn Error>> {
    let host_url = env::var("API_ADDRESS").unwrap_or_else(|_| DEFAULT_API_ADDRESS.to_string());

    let llm = Arc::new(LlmServiceProfiles::from_env()?);
    let assistant = chat_core::assistant_from_env(llm.clone()).await?;

    let (chat_cfg, emb_cfg) = llm.profiles();
    if chat_cfg.api_key.is_none() {
        warn!("OPENAI_API_KEY is not set; chat requests will fail");
    }
    let service_info = ServiceInfo::new(
        &chat_cfg.model,
        &emb_cfg.model,
        assistant.context_mode().as_str(),
    );

    let state = Arc::new(AppState::new(assistant, service_info));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&host_url).await?;
    info!(address = %host_url, "listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
