pub mod health;
pub mod tmdb;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /tmdb/search?query=          title search (pass-through)
/// /tmdb/movie/{id}             movie details (pass-through)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // TMDB proxy.
        .nest("/tmdb", tmdb::router())
}
