//! Route definitions for the TMDB proxy.

use axum::routing::get;
use axum::Router;

use crate::handlers::tmdb;
use crate::state::AppState;

/// TMDB proxy routes mounted at `/api/tmdb`.
///
/// ```text
/// GET /search        -> search
/// GET /movie         -> missing_movie_id (400)
/// GET /movie/{id}    -> movie_details
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/search", get(tmdb::search))
        .route("/movie", get(tmdb::missing_movie_id))
        .route("/movie/", get(tmdb::missing_movie_id))
        .route("/movie/{id}", get(tmdb::movie_details))
}
