use std::path::PathBuf;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Marquee API server (default: `http://localhost:3000`).
    pub api_url: String,
    /// Directory holding the local favorites store (default: `.marquee`).
    pub data_dir: PathBuf,
    /// Timeout for proxy requests in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `MARQUEE_API_URL`      | `http://localhost:3000`  |
    /// | `MARQUEE_DATA_DIR`     | `.marquee`               |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Self {
        let api_url = std::env::var("MARQUEE_API_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .trim_end_matches('/')
            .to_string();

        let data_dir = std::env::var("MARQUEE_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".marquee"));

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            api_url,
            data_dir,
            request_timeout_secs,
        }
    }
}
