//! View models derived from controller state.
//!
//! Nothing here mutates state. Each builder reads an [`AppController`] and
//! returns plain data the presentation layer can render; the `Display` impls
//! give the text rendering used by the interactive client.

use std::fmt;

use marquee_core::display::{
    overview_or_placeholder, poster_url, release_year, runtime_label, synopsis_excerpt, PosterSize,
};
use marquee_core::favorites::Rating;
use marquee_core::storage::KeyValueStore;
use marquee_core::types::MovieId;

use crate::controller::{AppController, DetailsState, SearchStatus};

/// Hint shown before the first search.
pub const SEARCH_HINT: &str = "Try searching for “Batman”, “Inception”, “Harry Potter”, etc.";

/// Shown when the favorites list is empty.
pub const NO_FAVORITES: &str = "No favorites yet. Add some from search results.";

/// One row of the search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCard {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    pub excerpt: String,
    pub poster_url: Option<String>,
    pub is_favorite: bool,
}

/// One row of the favorites list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteCard {
    pub id: MovieId,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
    pub rating: Rating,
    pub note: String,
}

/// What the detail overlay shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailsPanel {
    Hidden,
    Loading,
    Error(String),
    Loaded {
        title: String,
        year: String,
        runtime: String,
        overview: String,
        poster_url: Option<String>,
        is_favorite: bool,
    },
}

/// Status line above the results: the error, a loading marker, or the hint.
pub fn search_notice<S: KeyValueStore>(app: &AppController<S>) -> Option<String> {
    match app.search_status() {
        SearchStatus::Idle => Some(SEARCH_HINT.to_string()),
        SearchStatus::Loading => Some("Searching...".to_string()),
        SearchStatus::Error(message) => Some(message.clone()),
        SearchStatus::HasResults(_) => None,
    }
}

pub fn result_cards<S: KeyValueStore>(app: &AppController<S>) -> Vec<ResultCard> {
    app.results()
        .iter()
        .map(|item| ResultCard {
            id: item.id,
            title: item.title.clone(),
            year: release_year(item.release_date.as_deref()).to_string(),
            excerpt: synopsis_excerpt(&item.overview),
            poster_url: poster_url(item.poster_path.as_deref(), PosterSize::W185),
            is_favorite: app.is_favorite(item.id),
        })
        .collect()
}

pub fn favorite_cards<S: KeyValueStore>(app: &AppController<S>) -> Vec<FavoriteCard> {
    app.favorites()
        .iter()
        .map(|fav| FavoriteCard {
            id: fav.id,
            title: fav.title.clone(),
            year: release_year(fav.release_date.as_deref()).to_string(),
            poster_url: poster_url(fav.poster_path.as_deref(), PosterSize::W185),
            rating: fav.rating,
            note: fav.note.clone(),
        })
        .collect()
}

pub fn details_panel<S: KeyValueStore>(app: &AppController<S>) -> DetailsPanel {
    match app.details() {
        DetailsState::Closed => DetailsPanel::Hidden,
        DetailsState::Loading { .. } => DetailsPanel::Loading,
        DetailsState::Error { message, .. } => DetailsPanel::Error(message.clone()),
        DetailsState::Loaded { id, details } => DetailsPanel::Loaded {
            title: details.title.clone(),
            year: release_year(details.release_date.as_deref()).to_string(),
            runtime: runtime_label(details.runtime),
            overview: overview_or_placeholder(&details.overview).to_string(),
            poster_url: poster_url(details.poster_path.as_deref(), PosterSize::W342),
            is_favorite: app.is_favorite(*id),
        },
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

impl fmt::Display for ResultCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let star = if self.is_favorite { "★" } else { " " };
        writeln!(f, "{star} [{}] {} ({})", self.id, self.title, self.year)?;
        write!(f, "    {}", self.excerpt)
    }
}

impl fmt::Display for FavoriteCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({})  rating: {}/{}",
            self.id,
            self.title,
            self.year,
            self.rating,
            Rating::MAX
        )?;
        if !self.note.is_empty() {
            write!(f, "\n    note: {}", self.note)?;
        }
        Ok(())
    }
}

impl fmt::Display for DetailsPanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailsPanel::Hidden => Ok(()),
            DetailsPanel::Loading => write!(f, "Loading details…"),
            DetailsPanel::Error(message) => write!(f, "{message}"),
            DetailsPanel::Loaded {
                title,
                year,
                runtime,
                overview,
                poster_url,
                is_favorite,
            } => {
                let marker = if *is_favorite { " ★" } else { "" };
                writeln!(f, "{title}{marker}")?;
                writeln!(f, "Year: {year} · Runtime: {runtime}")?;
                if let Some(url) = poster_url {
                    writeln!(f, "Poster: {url}")?;
                }
                write!(f, "{overview}")
            }
        }
    }
}
