use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};
use crate::config::ServerConfig;

/// Router with the API and permissive CORS for browser front ends
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::router(state).layer(cors)
}

pub async fn run(server: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);
    axum::serve(listener, app(state))
        .await
        .with_context(|| "Web server terminated")?;
    Ok(())
}
