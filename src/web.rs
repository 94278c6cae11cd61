use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use crate::Result;
use crate::api::{self, AppState};
use crate::config::ServerConfig;

/// Full application router: health check plus the JSON API under `/api`
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .nest("/api", api::router(Arc::new(state)))
        .layer(ServiceBuilder::new().layer(cors))
}

pub async fn run(config: &ServerConfig, state: AppState) -> Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Route advisor listening on http://{}", addr);
    axum::serve(listener, app(state)).await?;
    Ok(())
}
