//! Query parameter types for the proxy handlers.

use serde::Deserialize;

/// Query parameters for `GET /api/tmdb/search` (`?query=`).
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: Option<String>,
}

impl SearchParams {
    /// Build from raw query pairs. When `query` repeats, the first value wins.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let query = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "query").then_some(value));
        Self { query }
    }

    /// The trimmed query, or `None` when missing or blank.
    pub fn normalized(&self) -> Option<&str> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}
