//! JSON API server adapter (`web` feature).
//!
//! Thin Axum layer over the backtest pipeline: query-driven runs of the
//! registered strategies, POSTed custom condition strategies, and the
//! strategy/margin listing the dashboard needs. Dashboard assets are served
//! from `static/`.

mod error;
mod handlers;

pub use error::WebError;
pub use handlers::{BacktestQuery, CustomBacktestRequest};

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::domain::error::PapertraderError;
use crate::domain::settings::Settings;
use crate::ports::data_port::DataPort;

pub struct AppState {
    pub data_port: Arc<dyn DataPort + Send + Sync>,
    pub settings: Settings,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/backtest", get(handlers::backtest))
        .route("/api/backtest/custom", post(handlers::custom_backtest))
        .route("/api/strategies", get(handlers::list_strategies))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(handlers::not_found)
        .with_state(Arc::new(state))
}

/// Scan for a free port starting at `start`, like the original dashboard did.
pub fn find_free_port(start: u16, attempts: u16) -> Result<u16, PapertraderError> {
    let end = start.saturating_add(attempts);
    for port in start..end {
        if std::net::TcpListener::bind(("0.0.0.0", port)).is_ok() {
            return Ok(port);
        }
    }
    Err(PapertraderError::Io(std::io::Error::other(format!(
        "no free port in range {start}-{end}"
    ))))
}

pub async fn serve(state: AppState) -> Result<(), PapertraderError> {
    let port = find_free_port(state.settings.port_start, state.settings.port_attempts)?;
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("serving dashboard API on http://localhost:{port}");
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}
