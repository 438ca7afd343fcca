//! HTTP API server

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use weather_core::WeatherProvider;

pub mod handlers;

/// Shared state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        Self { provider }
    }
}

impl From<Box<dyn WeatherProvider>> for AppState {
    fn from(provider: Box<dyn WeatherProvider>) -> Self {
        Self::new(Arc::from(provider))
    }
}

/// Build the API router using the provided application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/weather", get(handlers::get_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
