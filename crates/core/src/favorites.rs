//! The user's favorites list.
//!
//! [`FavoritesCollection`] keeps entries newest-first and enforces at most one
//! entry per movie. An identifier-keyed index is rebuilt after every mutation
//! so membership checks never scan the list.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::types::{MovieId, SearchResultItem};

// ---------------------------------------------------------------------------
// Rating
// ---------------------------------------------------------------------------

/// A user rating between [`Rating::MIN`] and [`Rating::MAX`] inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Validate a raw rating value.
    pub fn new(value: u8) -> Result<Self, CoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::Validation(format!(
                "Rating must be between {} and {}, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u8> for Rating {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// A favorited movie with the user's rating and note.
///
/// Catalog fields are copied from the search result at favoriting time and
/// are never modified afterwards; only `rating` and `note` change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: MovieId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    pub rating: Rating,
    #[serde(default)]
    pub note: String,
}

impl FavoriteEntry {
    /// Snapshot a search result with the default rating and an empty note.
    pub fn from_search_result(item: &SearchResultItem) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            release_date: item.release_date.clone(),
            overview: item.overview.clone(),
            poster_path: item.poster_path.clone(),
            rating: Rating::default(),
            note: String::new(),
        }
    }

    fn apply(&mut self, patch: FavoritePatch) {
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        if let Some(note) = patch.note {
            self.note = note;
        }
    }
}

/// Partial update of the user-editable fields of a [`FavoriteEntry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FavoritePatch {
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub note: Option<String>,
}

impl FavoritePatch {
    pub fn rating(rating: Rating) -> Self {
        Self {
            rating: Some(rating),
            note: None,
        }
    }

    pub fn note(note: impl Into<String>) -> Self {
        Self {
            rating: None,
            note: Some(note.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rating.is_none() && self.note.is_none()
    }
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// Ordered favorites, newest first, unique by movie id.
#[derive(Debug, Clone, Default)]
pub struct FavoritesCollection {
    entries: Vec<FavoriteEntry>,
    index: HashMap<MovieId, usize>,
}

impl FavoritesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from stored entries.
    ///
    /// Order is preserved. When the same id appears more than once, the first
    /// occurrence wins and later ones are dropped.
    pub fn from_entries(entries: Vec<FavoriteEntry>) -> Self {
        let mut deduped = Vec::with_capacity(entries.len());
        let mut seen = std::collections::HashSet::with_capacity(entries.len());
        for entry in entries {
            if seen.insert(entry.id) {
                deduped.push(entry);
            } else {
                tracing::debug!(id = entry.id, "Dropping duplicate favorite entry");
            }
        }

        let mut collection = Self {
            entries: deduped,
            index: HashMap::new(),
        };
        collection.reindex();
        collection
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FavoriteEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, id: MovieId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: MovieId) -> Option<&FavoriteEntry> {
        self.index.get(&id).map(|&pos| &self.entries[pos])
    }

    /// Prepend a favorite built from `item`. Returns `false` if it was already
    /// present, in which case nothing changes.
    pub fn add(&mut self, item: &SearchResultItem) -> bool {
        if self.contains(item.id) {
            return false;
        }
        self.entries.insert(0, FavoriteEntry::from_search_result(item));
        self.reindex();
        true
    }

    /// Remove the favorite with `id`. Returns `false` if it was not present.
    pub fn remove(&mut self, id: MovieId) -> bool {
        let Some(pos) = self.index.get(&id).copied() else {
            return false;
        };
        self.entries.remove(pos);
        self.reindex();
        true
    }

    /// Apply `patch` to the favorite with `id`. Returns `false` if it was not
    /// present.
    pub fn update(&mut self, id: MovieId, patch: FavoritePatch) -> bool {
        let Some(pos) = self.index.get(&id).copied() else {
            return false;
        };
        self.entries[pos].apply(patch);
        true
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id, pos))
            .collect();
    }
}

impl PartialEq for FavoritesCollection {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for FavoritesCollection {}

impl<'a> IntoIterator for &'a FavoritesCollection {
    type Item = &'a FavoriteEntry;
    type IntoIter = std::slice::Iter<'a, FavoriteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for FavoritesCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FavoritesCollection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<FavoriteEntry>::deserialize(deserializer).map(Self::from_entries)
    }
}
