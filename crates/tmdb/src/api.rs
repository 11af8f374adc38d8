//! HTTP client for the TMDB v3 endpoints used by the proxy.
//!
//! Wraps title search and single-movie lookup using [`reqwest`]. The API key
//! is attached as a query parameter on every request and stripped from any
//! error before it can reach a log line.

use marquee_core::types::MovieId;

/// Production base URL of the TMDB v3 API.
pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// HTTP client for the TMDB API, bound to one credential.
#[derive(Clone)]
pub struct TmdbApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for TmdbApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TmdbApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Errors from the TMDB REST layer.
#[derive(Debug, thiserror::Error)]
pub enum TmdbApiError {
    /// The HTTP request failed (network, DNS, TLS) or the body was not JSON.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// TMDB returned a non-2xx status code.
    #[error("TMDB API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },
}

impl TmdbApi {
    /// Create a client for `base_url` (no trailing slash), e.g.
    /// [`DEFAULT_BASE_URL`].
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Create a client reusing an existing [`reqwest::Client`]
    /// (connection pooling, custom timeouts).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search movies by title.
    ///
    /// Sends `GET /search/movie?query=…&include_adult=false`. Adult titles are
    /// always excluded.
    pub async fn search_movies(&self, query: &str) -> Result<serde_json::Value, TmdbApiError> {
        tracing::debug!(%query, "TMDB search");

        let response = self
            .client
            .get(format!("{}/search/movie", self.base_url))
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("query", query),
                ("include_adult", "false"),
            ])
            .send()
            .await
            .map_err(redact)?;

        Self::parse_response(response).await
    }

    /// Fetch the full record of one movie.
    ///
    /// Sends `GET /movie/{id}`.
    pub async fn movie_details(&self, id: MovieId) -> Result<serde_json::Value, TmdbApiError> {
        tracing::debug!(id, "TMDB movie details");

        let response = self
            .client
            .get(format!("{}/movie/{}", self.base_url, id))
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await
            .map_err(redact)?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, or return a
    /// [`TmdbApiError::ApiError`] with the status and body text.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TmdbApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TmdbApiError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response(
        response: reqwest::Response,
    ) -> Result<serde_json::Value, TmdbApiError> {
        let response = Self::ensure_success(response).await?;
        response
            .json::<serde_json::Value>()
            .await
            .map_err(redact)
    }
}

/// Drop the request URL (which carries the API key) from a reqwest error.
fn redact(err: reqwest::Error) -> TmdbApiError {
    TmdbApiError::Request(err.without_url())
}
