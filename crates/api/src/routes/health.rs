use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall service status.
    pub status: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether a TMDB credential is configured.
    pub tmdb_configured: bool,
}

/// GET /health -- returns service health.
///
/// Reports `degraded` when the proxy routes cannot reach TMDB for lack of a
/// credential. TMDB itself is not contacted.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let tmdb_configured = state.tmdb.is_some();

    let status = if tmdb_configured { "ok" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        tmdb_configured,
    })
}

/// Mount health check routes (intended for root-level, NOT under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
