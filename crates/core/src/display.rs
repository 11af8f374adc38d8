//! Formatting helpers for rendering movies.

/// Base URL of the upstream image CDN.
pub const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";

/// Placeholder for a missing year or runtime.
pub const MISSING: &str = "—";

/// Synopsis length shown on result cards before truncation.
pub const EXCERPT_CHARS: usize = 180;

/// Poster widths offered by the image CDN.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    /// List thumbnails.
    W185,
    /// Detail overlay.
    W342,
}

impl PosterSize {
    pub fn as_str(self) -> &'static str {
        match self {
            PosterSize::W185 => "w185",
            PosterSize::W342 => "w342",
        }
    }
}

/// Full poster URL for an opaque poster path, if there is one.
pub fn poster_url(path: Option<&str>, size: PosterSize) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE_URL}/{}{p}", size.as_str()))
}

/// Four-digit year from an upstream date string, or [`MISSING`].
pub fn release_year(release_date: Option<&str>) -> &str {
    match release_date {
        Some(date) if !date.is_empty() => date.get(..4).unwrap_or(date),
        _ => MISSING,
    }
}

/// Card excerpt of a synopsis, cut on a character boundary.
pub fn synopsis_excerpt(overview: &str) -> String {
    if overview.is_empty() {
        return "No description.".to_string();
    }
    let mut chars = overview.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}

/// Overview text for the detail overlay.
pub fn overview_or_placeholder(overview: &str) -> &str {
    if overview.is_empty() {
        "No overview available."
    } else {
        overview
    }
}

pub fn runtime_label(runtime: Option<u32>) -> String {
    match runtime {
        Some(minutes) if minutes > 0 => format!("{minutes} min"),
        _ => MISSING.to_string(),
    }
}
