//! Movie metadata shapes returned by the upstream catalog.
//!
//! These types only model the fields the application reads. The proxy passes
//! upstream bodies through untouched, so anything not listed here is ignored
//! on the client side.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Catalog identifier of a movie.
pub type MovieId = i64;

/// One entry of a title search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Envelope of a title search response.
///
/// Only `results` is required by the client; a body without it is treated
/// as an empty result list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResultItem>,
}

/// Full record for a single movie, fetched when the detail overlay opens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDetails {
    pub id: MovieId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Runtime in minutes. Upstream reports `null` or `0` when unknown.
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Parse a movie identifier from a path segment or user input.
///
/// Surrounding whitespace is ignored. Only positive integers are accepted.
pub fn parse_movie_id(raw: &str) -> Result<MovieId, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Missing movie id.".to_string()));
    }
    match trimmed.parse::<MovieId>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(CoreError::Validation("Invalid movie id.".to_string())),
    }
}
