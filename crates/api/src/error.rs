use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marquee_core::error::CoreError;
use marquee_tmdb::TmdbApiError;
use serde::Serialize;

/// Message returned when the TMDB credential is missing.
pub const MISCONFIGURED_MESSAGE: &str = "TMDB_API_KEY is not set on the server.";

/// Message returned for upstream non-success responses.
pub const UPSTREAM_FAILED_MESSAGE: &str = "TMDB request failed";

/// Message returned for any unexpected server-side failure.
pub const INTERNAL_MESSAGE: &str = "Unexpected server error.";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`TmdbApiError`] for upstream
/// failures. Implements [`IntoResponse`] to produce the uniform
/// `{ error, code, status?, details? }` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `marquee_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// An error talking to TMDB.
    #[error(transparent)]
    Upstream(#[from] TmdbApiError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The server has no TMDB credential.
    #[error("Server misconfigured: TMDB_API_KEY is not set")]
    ServerMisconfigured,
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    /// Upstream HTTP status, only for upstream failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Raw upstream body, only for upstream failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    fn new(error: impl Into<String>, code: &'static str) -> Self {
        Self {
            error: error.into(),
            code,
            status: None,
            details: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, ErrorBody::new(msg, "BAD_REQUEST"))
                }
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    ErrorBody::new(format!("{entity} with id {id} not found"), "NOT_FOUND"),
                ),
            },

            // --- Upstream errors ---
            AppError::Upstream(TmdbApiError::ApiError { status, body }) => {
                tracing::warn!(upstream_status = status, "TMDB returned an error");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        error: UPSTREAM_FAILED_MESSAGE.to_string(),
                        code: "UPSTREAM_ERROR",
                        status: Some(status),
                        details: Some(body),
                    },
                )
            }
            AppError::Upstream(TmdbApiError::Request(err)) => {
                tracing::error!(error = %err, "TMDB request failed");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new(msg, "BAD_REQUEST"))
            }
            AppError::ServerMisconfigured => {
                tracing::error!("TMDB_API_KEY is not set; rejecting proxy request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new(MISCONFIGURED_MESSAGE, "SERVER_MISCONFIGURED"),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Response used by the panic-recovery layer, in the same envelope as every
/// other server-side failure.
pub fn panic_response(_panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    let (status, body) = internal();
    (status, axum::Json(body)).into_response()
}

fn internal() -> (StatusCode, ErrorBody) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorBody::new(INTERNAL_MESSAGE, "INTERNAL_ERROR"),
    )
}
