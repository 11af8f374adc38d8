#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use marquee_api::config::{ServerConfig, TmdbConfig};
use marquee_api::router::{build_app_router, upstream_timeout};
use marquee_api::state::AppState;

/// Build a test `ServerConfig` pointing TMDB at `base_url`.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(base_url: &str, api_key: Option<&str>) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        tmdb: TmdbConfig {
            api_key: api_key.map(str::to_string),
            base_url: base_url.to_string(),
        },
    }
}

/// Build the full application router through the production builder, so
/// tests exercise the same middleware stack (CORS, request ID, timeout,
/// tracing, panic recovery).
pub fn build_test_app(config: ServerConfig) -> Router {
    let http = reqwest::Client::builder()
        .timeout(upstream_timeout(&config))
        .build()
        .unwrap();
    let state = AppState::new(config.clone(), http);
    build_app_router(state, &config)
}

/// App with a credential, forwarding to `base_url`.
pub fn configured_app(base_url: &str) -> Router {
    build_test_app(test_config(base_url, Some("test-key")))
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
