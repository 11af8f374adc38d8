//! Handlers for the TMDB proxy endpoints.
//!
//! Both handlers are stateless pass-throughs: validate the required input,
//! attach the server-held credential, forward to TMDB, and return the
//! upstream JSON body unchanged. Nothing is cached and nothing is retried.

use axum::extract::{Path, Query, State};
use axum::Json;
use marquee_core::error::CoreError;
use marquee_core::types::parse_movie_id;
use marquee_tmdb::TmdbApi;

use crate::error::{AppError, AppResult};
use crate::query::SearchParams;
use crate::state::AppState;

/// GET /api/tmdb/search?query=
///
/// Title search with adult content excluded.
pub async fn search(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<serde_json::Value>> {
    let params = SearchParams::from_pairs(pairs);
    let query = params
        .normalized()
        .ok_or_else(|| AppError::BadRequest("Missing query parameter.".to_string()))?;

    let tmdb = upstream(&state)?;
    let body = tmdb.search_movies(query).await?;

    tracing::debug!(%query, "Search proxied");
    Ok(Json(body))
}

/// GET /api/tmdb/movie/{id}
///
/// Full record of a single movie.
pub async fn movie_details(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let id = parse_movie_id(&raw_id)?;

    let tmdb = upstream(&state)?;
    let body = tmdb.movie_details(id).await?;

    tracing::debug!(id, "Movie details proxied");
    Ok(Json(body))
}

/// GET /api/tmdb/movie
///
/// The identifier segment is required.
pub async fn missing_movie_id() -> AppError {
    AppError::Core(CoreError::Validation("Missing movie id.".to_string()))
}

fn upstream(state: &AppState) -> AppResult<&TmdbApi> {
    state.tmdb.as_deref().ok_or(AppError::ServerMisconfigured)
}
