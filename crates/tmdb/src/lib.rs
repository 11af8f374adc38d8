//! REST client for the TMDB movie metadata API.
//!
//! The proxy forwards upstream bodies untouched, so the client returns raw
//! [`serde_json::Value`]s and leaves typed decoding to consumers.

pub mod api;

pub use api::{TmdbApi, TmdbApiError, DEFAULT_BASE_URL};
