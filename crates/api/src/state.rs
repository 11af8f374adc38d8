use std::sync::Arc;

use marquee_tmdb::TmdbApi;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Upstream client, absent when no TMDB credential is configured.
    pub tmdb: Option<Arc<TmdbApi>>,
}

impl AppState {
    /// Build state from configuration, sharing one pooled HTTP client.
    pub fn new(config: ServerConfig, http: reqwest::Client) -> Self {
        let tmdb = config.tmdb.api_key.as_ref().map(|key| {
            Arc::new(TmdbApi::with_client(
                http,
                config.tmdb.base_url.clone(),
                key.clone(),
            ))
        });

        Self {
            config: Arc::new(config),
            tmdb,
        }
    }
}
