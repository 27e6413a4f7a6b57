mod api;
mod config;
mod dto;
mod error;
mod service;
mod state;

use std::{sync::Arc, time::Instant};

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use carbon_passport::gateway::MAX_PHOTO_BYTES;
use tracing::{error, info};

use crate::{config::Config, state::AppState};

/// Room for the photo plus the text fields of the multipart form.
const MAX_BODY_BYTES: usize = MAX_PHOTO_BYTES + 1024 * 1024;

fn router(state: Arc<AppState>) -> axum::Router {
    axum::Router::new()
        .route("/api/passports", post(api::create))
        .route("/api/passports/{id}", get(api::passport))
        .route("/api/passports/{id}/survey", put(api::survey))
        .route("/api/passports/share/{hash}", get(api::shared))
        .route("/api/stations", get(api::stations))
        .route("/api/stations/search", get(api::search))
        .route("/api/routes/calculate", post(api::calculate))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    info!("Starting server...");
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("{err}");
            std::process::exit(1);
        }
    };

    info!("Loading stations...");
    let now = Instant::now();
    let state = match AppState::load(config) {
        Ok(state) => Arc::new(state),
        Err(err) => {
            error!("Failed to load stations: {err}");
            std::process::exit(1);
        }
    };
    info!(
        "Loaded {} stations in {:?}",
        state.repository.len(),
        now.elapsed()
    );

    let port = state.config.port;
    let app = router(state);
    let listener = match tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("Failed to bind port {port}: {err}");
            std::process::exit(1);
        }
    };
    info!("Listening to port {port}");
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server stopped: {err}");
    }
}
