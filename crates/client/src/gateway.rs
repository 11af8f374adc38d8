//! Access to the Marquee proxy from the client side.
//!
//! [`MovieGateway`] is the port the controller talks to; [`HttpGateway`] is
//! the production adapter that calls the proxy over HTTP and maps its error
//! envelope onto [`GatewayError`].

use async_trait::async_trait;
use marquee_core::types::{ItemDetails, MovieId, SearchResponse, SearchResultItem};
use serde::Deserialize;

/// Failure of a gateway call, classified by who is at fault.
///
/// The `Display` output is the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// Bad or missing user input, rejected by the proxy.
    #[error("{message}")]
    Validation { message: String },

    /// The proxy has no upstream credential.
    #[error("{message}")]
    Configuration { message: String },

    /// The upstream catalog answered with a non-success status.
    #[error("{message}")]
    Upstream {
        message: String,
        status: Option<u16>,
        details: Option<String>,
    },

    /// The proxy could not be reached, failed internally, or sent an
    /// unreadable body.
    #[error("{message}")]
    Transport { message: String },
}

impl GatewayError {
    pub fn message(&self) -> &str {
        match self {
            GatewayError::Validation { message }
            | GatewayError::Configuration { message }
            | GatewayError::Upstream { message, .. }
            | GatewayError::Transport { message } => message,
        }
    }
}

/// Port used by the controller to reach the movie catalog.
#[async_trait]
pub trait MovieGateway: Send + Sync {
    /// Title search. `query` is already trimmed and non-empty.
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, GatewayError>;

    /// Full record of one movie.
    async fn movie_details(&self, id: MovieId) -> Result<ItemDetails, GatewayError>;
}

// ---------------------------------------------------------------------------
// HTTP adapter
// ---------------------------------------------------------------------------

/// Which call failed, for picking fallback messages.
#[derive(Debug, Clone, Copy)]
enum Operation {
    Search,
    Details,
}

impl Operation {
    fn fallback_message(self) -> &'static str {
        match self {
            Operation::Search => "Search failed.",
            Operation::Details => "Failed to load details.",
        }
    }

    fn network_message(self) -> &'static str {
        match self {
            Operation::Search => "Network error. Please try again.",
            Operation::Details => "Network error while loading details.",
        }
    }

    fn network_error(self) -> GatewayError {
        GatewayError::Transport {
            message: self.network_message().to_string(),
        }
    }
}

/// Error envelope produced by the proxy.
#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    status: Option<u16>,
    #[serde(default)]
    details: Option<String>,
}

/// [`MovieGateway`] over the proxy's HTTP routes.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    base_url: String,
}

impl HttpGateway {
    /// Create a gateway for the proxy at `base_url`, e.g.
    /// `http://localhost:3000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json(
        &self,
        request: reqwest::RequestBuilder,
        op: Operation,
    ) -> Result<serde_json::Value, GatewayError> {
        let response = request.send().await.map_err(|e| {
            tracing::warn!(error = %e, ?op, "Proxy request failed");
            op.network_error()
        })?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.map_err(|e| {
            tracing::warn!(error = %e, ?op, "Proxy response was not JSON");
            op.network_error()
        })?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(classify_failure(status.as_u16(), body, op))
        }
    }
}

#[async_trait]
impl MovieGateway for HttpGateway {
    async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, GatewayError> {
        let request = self
            .client
            .get(format!("{}/api/tmdb/search", self.base_url))
            .query(&[("query", query)]);
        let body = self.get_json(request, Operation::Search).await?;

        let parsed: SearchResponse = serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, "Unexpected search response shape");
            Operation::Search.network_error()
        })?;
        Ok(parsed.results)
    }

    async fn movie_details(&self, id: MovieId) -> Result<ItemDetails, GatewayError> {
        let request = self
            .client
            .get(format!("{}/api/tmdb/movie/{}", self.base_url, id));
        let body = self.get_json(request, Operation::Details).await?;

        serde_json::from_value(body).map_err(|e| {
            tracing::warn!(error = %e, id, "Unexpected details response shape");
            Operation::Details.network_error()
        })
    }
}

/// Map a non-success proxy response onto the error taxonomy.
///
/// The envelope's `code` decides the class; the HTTP status is the fallback
/// for envelopes without one.
fn classify_failure(http_status: u16, body: serde_json::Value, op: Operation) -> GatewayError {
    let envelope: ErrorEnvelope = serde_json::from_value(body).unwrap_or_default();
    let message = envelope
        .error
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| op.fallback_message().to_string());

    match (envelope.code.as_deref(), http_status) {
        (Some("BAD_REQUEST"), _) | (None, 400) => GatewayError::Validation { message },
        (Some("SERVER_MISCONFIGURED"), _) => GatewayError::Configuration { message },
        (Some("UPSTREAM_ERROR"), _) | (None, 502) => GatewayError::Upstream {
            message,
            status: envelope.status,
            details: envelope.details,
        },
        _ => GatewayError::Transport { message },
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use mockito::{Matcher, Server};

    use super::*;

    #[tokio::test]
    async fn search_returns_results_array() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/tmdb/search")
            .match_query(Matcher::UrlEncoded("query".into(), "Inception".into()))
            .with_status(200)
            .with_body(
                r#"{"page":1,"results":[{"id":27205,"title":"Inception","release_date":"2010-07-15","overview":"...","poster_path":"/abc.jpg"}]}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let gateway = HttpGateway::new(server.url());
        let results = gateway.search("Inception").await.unwrap();

        mock.assert_async().await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 27205);
        assert_eq!(results[0].poster_path.as_deref(), Some("/abc.jpg"));
    }

    #[tokio::test]
    async fn search_body_without_results_is_empty() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tmdb/search")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"page":1}"#)
            .create_async()
            .await;

        let gateway = HttpGateway::new(server.url());
        assert!(gateway.search("nothing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn upstream_envelope_maps_to_upstream_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tmdb/movie/999999")
            .with_status(502)
            .with_body(
                r#"{"error":"TMDB request failed","code":"UPSTREAM_ERROR","status":404,"details":"nope"}"#,
            )
            .create_async()
            .await;

        let gateway = HttpGateway::new(server.url());
        let err = gateway.movie_details(999999).await.unwrap_err();

        assert_matches!(
            err,
            GatewayError::Upstream { ref message, status: Some(404), .. } if message == "TMDB request failed"
        );
    }

    #[tokio::test]
    async fn misconfiguration_maps_to_configuration_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tmdb/search")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(
                r#"{"error":"TMDB_API_KEY is not set on the server.","code":"SERVER_MISCONFIGURED"}"#,
            )
            .create_async()
            .await;

        let gateway = HttpGateway::new(server.url());
        let err = gateway.search("x").await.unwrap_err();

        assert_matches!(err, GatewayError::Configuration { .. });
        assert_eq!(err.to_string(), "TMDB_API_KEY is not set on the server.");
    }

    #[tokio::test]
    async fn envelope_without_message_uses_fallback() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tmdb/search")
            .match_query(Matcher::Any)
            .with_status(400)
            .with_body("{}")
            .create_async()
            .await;

        let gateway = HttpGateway::new(server.url());
        let err = gateway.search("x").await.unwrap_err();

        assert_eq!(
            err,
            GatewayError::Validation {
                message: "Search failed.".to_string()
            }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_a_network_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/tmdb/movie/1")
            .with_status(200)
            .with_body("<html></html>")
            .create_async()
            .await;

        let gateway = HttpGateway::new(server.url());
        let err = gateway.movie_details(1).await.unwrap_err();

        assert_eq!(err.message(), "Network error while loading details.");
    }

    #[tokio::test]
    async fn unreachable_proxy_is_a_network_error() {
        let gateway = HttpGateway::new("http://127.0.0.1:9");
        let err = gateway.search("x").await.unwrap_err();

        assert_matches!(err, GatewayError::Transport { .. });
        assert_eq!(err.message(), "Network error. Please try again.");
    }
}
