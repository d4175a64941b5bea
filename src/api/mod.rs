//! HTTP surface over [`InvestmentService`]

pub mod error;
mod handlers;

use crate::core::InvestmentService;
use crate::core::config::ServerConfig;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct AppState {
    pub service: InvestmentService,
}

fn cors_layer(config: &ServerConfig) -> Result<CorsLayer> {
    if config.cors_allow_origins.iter().any(|o| o == "*") {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }
    let origins = config
        .cors_allow_origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {o}"))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any))
}

pub fn app_router(service: InvestmentService, config: &ServerConfig) -> Result<Router> {
    let state = Arc::new(AppState { service });

    let api = Router::new()
        .route("/funds", get(handlers::list_funds))
        .route("/funds/{fund_id}", get(handlers::get_fund))
        .route("/funds/{fund_id}/quote", get(handlers::get_quote))
        .route("/invest", post(handlers::deposit))
        .route("/deposit", post(handlers::deposit))
        .route("/portfolio/{user_id}", get(handlers::get_portfolio));

    Ok(Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .with_state(state)
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http()))
}

/// Binds `config.listen_addr` and serves until the process is stopped.
pub async fn serve(service: InvestmentService, config: &ServerConfig) -> Result<()> {
    let router = app_router(service, config)?;
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, router)
        .await
        .context("HTTP server failed")?;
    Ok(())
}
