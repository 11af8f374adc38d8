//! Client application state.
//!
//! [`AppController`] owns the search state, the detail overlay, and the
//! favorites collection. Every mutation goes through its methods; favorites
//! are written to the backing store after each change.
//!
//! Network-bound operations are split in two halves so late responses can be
//! recognised: `begin_*`/`open_*` records the request and returns a ticket,
//! and `finish_*` applies the outcome only if that ticket still describes the
//! current state. The async helpers [`AppController::search`] and
//! [`AppController::show_details`] run both halves back to back.

use marquee_core::favorites::{FavoritePatch, FavoritesCollection};
use marquee_core::storage::{FavoritesStore, KeyValueStore};
use marquee_core::types::{ItemDetails, MovieId, SearchResultItem};

use crate::gateway::{GatewayError, MovieGateway};

/// Shown when a search is submitted with an empty query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter a movie title.";

/// Shown when a search succeeds with zero results.
pub const NO_RESULTS_MESSAGE: &str = "No results found.";

// ---------------------------------------------------------------------------
// State types
// ---------------------------------------------------------------------------

/// Status of the search panel. Results only exist in `HasResults`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchStatus {
    #[default]
    Idle,
    Loading,
    Error(String),
    HasResults(Vec<SearchResultItem>),
}

impl SearchStatus {
    pub fn results(&self) -> &[SearchResultItem] {
        match self {
            SearchStatus::HasResults(results) => results,
            _ => &[],
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchStatus::Loading)
    }
}

/// State of the detail overlay. Every open variant carries the id it was
/// opened for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailsState {
    #[default]
    Closed,
    Loading {
        id: MovieId,
    },
    Error {
        id: MovieId,
        message: String,
    },
    Loaded {
        id: MovieId,
        details: ItemDetails,
    },
}

impl DetailsState {
    pub fn is_open(&self) -> bool {
        !matches!(self, DetailsState::Closed)
    }

    /// The movie the overlay currently pertains to.
    pub fn id(&self) -> Option<MovieId> {
        match self {
            DetailsState::Closed => None,
            DetailsState::Loading { id }
            | DetailsState::Error { id, .. }
            | DetailsState::Loaded { id, .. } => Some(*id),
        }
    }
}

/// Handle for an issued search, redeemed by [`AppController::finish_search`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a search ticket must be finished for its result to be shown"]
pub struct SearchTicket {
    generation: u64,
    query: String,
}

impl SearchTicket {
    /// The trimmed query to send.
    pub fn query(&self) -> &str {
        &self.query
    }
}

/// Handle for an issued detail request, redeemed by
/// [`AppController::finish_details`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a details ticket must be finished for its result to be shown"]
pub struct DetailsTicket {
    id: MovieId,
}

impl DetailsTicket {
    pub fn id(&self) -> MovieId {
        self.id
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Owner of all client state.
#[derive(Debug)]
pub struct AppController<S> {
    query: String,
    search: SearchStatus,
    search_generation: u64,
    details: DetailsState,
    favorites: FavoritesCollection,
    store: FavoritesStore<S>,
}

impl<S: KeyValueStore> AppController<S> {
    /// Create a controller, loading any stored favorites from `backend`.
    pub fn new(backend: S) -> Self {
        let store = FavoritesStore::new(backend);
        let favorites = store.load();
        tracing::info!(favorites = favorites.len(), "Controller initialised");

        Self {
            query: String::new(),
            search: SearchStatus::Idle,
            search_generation: 0,
            details: DetailsState::Closed,
            favorites,
            store,
        }
    }

    // -- Accessors ------------------------------------------------------------

    /// The last submitted query, trimmed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn search_status(&self) -> &SearchStatus {
        &self.search
    }

    /// Current results, empty unless the last search produced some.
    pub fn results(&self) -> &[SearchResultItem] {
        self.search.results()
    }

    /// Look up a movie from the current results.
    pub fn result(&self, id: MovieId) -> Option<&SearchResultItem> {
        self.results().iter().find(|item| item.id == id)
    }

    pub fn details(&self) -> &DetailsState {
        &self.details
    }

    pub fn favorites(&self) -> &FavoritesCollection {
        &self.favorites
    }

    pub fn is_favorite(&self, id: MovieId) -> bool {
        self.favorites.contains(id)
    }

    pub fn store(&self) -> &FavoritesStore<S> {
        &self.store
    }

    // -- Search ---------------------------------------------------------------

    /// Start a search.
    ///
    /// Clears previous results. A blank query sets the validation error and
    /// returns `None`; no request should be issued in that case.
    pub fn begin_search(&mut self, raw_query: &str) -> Option<SearchTicket> {
        let query = raw_query.trim().to_string();
        self.query.clone_from(&query);
        // Any outstanding search is superseded, including by a blank one.
        self.search_generation += 1;

        if query.is_empty() {
            self.search = SearchStatus::Error(EMPTY_QUERY_MESSAGE.to_string());
            return None;
        }

        self.search = SearchStatus::Loading;
        Some(SearchTicket {
            generation: self.search_generation,
            query,
        })
    }

    /// Apply the outcome of a search. Returns `false` when the ticket was
    /// superseded by a later search and the outcome was discarded.
    pub fn finish_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<SearchResultItem>, GatewayError>,
    ) -> bool {
        if ticket.generation != self.search_generation {
            tracing::debug!(query = %ticket.query, "Discarding stale search response");
            return false;
        }

        self.search = match outcome {
            Ok(results) if results.is_empty() => {
                SearchStatus::Error(NO_RESULTS_MESSAGE.to_string())
            }
            Ok(results) => {
                tracing::debug!(query = %ticket.query, count = results.len(), "Search completed");
                SearchStatus::HasResults(results)
            }
            Err(err) => {
                tracing::info!(query = %ticket.query, error = %err, "Search failed");
                SearchStatus::Error(err.message().to_string())
            }
        };
        true
    }

    /// Run a full search through `gateway`.
    pub async fn search<G>(&mut self, gateway: &G, raw_query: &str)
    where
        G: MovieGateway + ?Sized,
    {
        let Some(ticket) = self.begin_search(raw_query) else {
            return;
        };
        let outcome = gateway.search(ticket.query()).await;
        self.finish_search(ticket, outcome);
    }

    // -- Details --------------------------------------------------------------

    /// Open the overlay for `id` in the loading state.
    pub fn open_details(&mut self, id: MovieId) -> DetailsTicket {
        self.details = DetailsState::Loading { id };
        DetailsTicket { id }
    }

    /// Apply the outcome of a detail request. Returns `false` when the overlay
    /// has since been closed or moved to another movie and the outcome was
    /// discarded.
    pub fn finish_details(
        &mut self,
        ticket: DetailsTicket,
        outcome: Result<ItemDetails, GatewayError>,
    ) -> bool {
        let current = match self.details {
            DetailsState::Loading { id } => id,
            _ => {
                tracing::debug!(id = ticket.id, "Discarding details response for inactive overlay");
                return false;
            }
        };
        if current != ticket.id {
            tracing::debug!(id = ticket.id, current, "Discarding stale details response");
            return false;
        }

        self.details = match outcome {
            Ok(details) => DetailsState::Loaded {
                id: ticket.id,
                details,
            },
            Err(err) => {
                tracing::info!(id = ticket.id, error = %err, "Loading details failed");
                DetailsState::Error {
                    id: ticket.id,
                    message: err.message().to_string(),
                }
            }
        };
        true
    }

    pub fn close_details(&mut self) {
        self.details = DetailsState::Closed;
    }

    /// Open the overlay for `id` and load it through `gateway`.
    pub async fn show_details<G>(&mut self, gateway: &G, id: MovieId)
    where
        G: MovieGateway + ?Sized,
    {
        let ticket = self.open_details(id);
        let outcome = gateway.movie_details(id).await;
        self.finish_details(ticket, outcome);
    }

    // -- Favorites ------------------------------------------------------------

    /// Favorite a search result. No-op if it is already a favorite.
    pub fn add_favorite(&mut self, item: &SearchResultItem) -> bool {
        let added = self.favorites.add(item);
        if added {
            tracing::info!(id = item.id, title = %item.title, "Favorite added");
            self.persist();
        }
        added
    }

    /// Remove a favorite. No-op if it is not a favorite.
    pub fn remove_favorite(&mut self, id: MovieId) -> bool {
        let removed = self.favorites.remove(id);
        if removed {
            tracing::info!(id, "Favorite removed");
            self.persist();
        }
        removed
    }

    /// Change the rating and/or note of a favorite. No-op if it is not a
    /// favorite or the patch is empty.
    pub fn update_favorite(&mut self, id: MovieId, patch: FavoritePatch) -> bool {
        if patch.is_empty() {
            return false;
        }
        let updated = self.favorites.update(id, patch);
        if updated {
            tracing::debug!(id, "Favorite updated");
            self.persist();
        }
        updated
    }

    fn persist(&self) {
        self.store.save(&self.favorites);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use marquee_core::favorites::Rating;
    use marquee_core::storage::{JsonFileStore, MemoryStore};

    use super::*;

    /// Gateway double with canned responses and call counters.
    #[derive(Default)]
    struct FakeGateway {
        search_results: Mutex<HashMap<String, Result<Vec<SearchResultItem>, GatewayError>>>,
        details: Mutex<HashMap<MovieId, Result<ItemDetails, GatewayError>>>,
        search_calls: AtomicUsize,
        details_calls: AtomicUsize,
    }

    impl FakeGateway {
        fn with_search(self, query: &str, outcome: Result<Vec<SearchResultItem>, GatewayError>) -> Self {
            self.search_results
                .lock()
                .unwrap()
                .insert(query.to_string(), outcome);
            self
        }

        fn with_details(self, id: MovieId, outcome: Result<ItemDetails, GatewayError>) -> Self {
            self.details.lock().unwrap().insert(id, outcome);
            self
        }
    }

    #[async_trait]
    impl MovieGateway for FakeGateway {
        async fn search(&self, query: &str) -> Result<Vec<SearchResultItem>, GatewayError> {
            self.search_calls.fetch_add(1, Ordering::SeqCst);
            self.search_results
                .lock()
                .unwrap()
                .get(query)
                .cloned()
                .unwrap_or(Ok(Vec::new()))
        }

        async fn movie_details(&self, id: MovieId) -> Result<ItemDetails, GatewayError> {
            self.details_calls.fetch_add(1, Ordering::SeqCst);
            self.details
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .unwrap_or_else(|| {
                    Err(GatewayError::Transport {
                        message: "Network error while loading details.".to_string(),
                    })
                })
        }
    }

    fn inception() -> SearchResultItem {
        SearchResultItem {
            id: 27205,
            title: "Inception".to_string(),
            release_date: Some("2010-07-15".to_string()),
            overview: "...".to_string(),
            poster_path: Some("/abc.jpg".to_string()),
        }
    }

    fn details(id: MovieId, title: &str) -> ItemDetails {
        ItemDetails {
            id,
            title: title.to_string(),
            overview: String::new(),
            release_date: None,
            runtime: Some(100),
            poster_path: None,
        }
    }

    fn controller() -> AppController<MemoryStore> {
        AppController::new(MemoryStore::new())
    }

    // -- Search ---------------------------------------------------------------

    #[tokio::test]
    async fn inception_scenario_then_favorite() {
        let gateway = FakeGateway::default().with_search("Inception", Ok(vec![inception()]));
        let mut app = controller();

        app.search(&gateway, "Inception").await;

        assert_eq!(gateway.search_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app.search_status(), &SearchStatus::HasResults(vec![inception()]));

        let item = app.result(27205).cloned().unwrap();
        assert!(app.add_favorite(&item));

        let favs = app.favorites();
        assert_eq!(favs.len(), 1);
        let entry = favs.get(27205).unwrap();
        assert_eq!(entry.rating.get(), 3);
        assert_eq!(entry.note, "");
        assert!(app.is_favorite(27205));
    }

    #[tokio::test]
    async fn blank_query_issues_no_request() {
        let gateway = FakeGateway::default();
        let mut app = controller();

        app.search(&gateway, "   ").await;

        assert_eq!(gateway.search_calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            app.search_status(),
            &SearchStatus::Error(EMPTY_QUERY_MESSAGE.to_string())
        );
        assert!(app.results().is_empty());
    }

    #[tokio::test]
    async fn query_is_trimmed_before_sending() {
        let gateway = FakeGateway::default().with_search("Inception", Ok(vec![inception()]));
        let mut app = controller();

        app.search(&gateway, "  Inception \n").await;

        assert_eq!(app.query(), "Inception");
        assert_eq!(app.results().len(), 1);
    }

    #[tokio::test]
    async fn empty_results_become_no_results_error() {
        let gateway = FakeGateway::default().with_search("zzzz", Ok(Vec::new()));
        let mut app = controller();

        app.search(&gateway, "zzzz").await;

        assert_eq!(
            app.search_status(),
            &SearchStatus::Error(NO_RESULTS_MESSAGE.to_string())
        );
    }

    #[tokio::test]
    async fn search_failure_shows_gateway_message() {
        let gateway = FakeGateway::default().with_search(
            "Inception",
            Err(GatewayError::Upstream {
                message: "TMDB request failed".to_string(),
                status: Some(401),
                details: None,
            }),
        );
        let mut app = controller();

        app.search(&gateway, "Inception").await;

        assert_eq!(
            app.search_status(),
            &SearchStatus::Error("TMDB request failed".to_string())
        );
    }

    #[test]
    fn begin_search_clears_previous_results() {
        let mut app = controller();
        let ticket = app.begin_search("Inception").unwrap();
        app.finish_search(ticket, Ok(vec![inception()]));
        assert_eq!(app.results().len(), 1);

        let _ticket = app.begin_search("Alien").unwrap();
        assert!(app.search_status().is_loading());
        assert!(app.results().is_empty());
    }

    #[test]
    fn superseded_search_response_is_discarded() {
        let mut app = controller();
        let first = app.begin_search("Inception").unwrap();
        let second = app.begin_search("Alien").unwrap();

        let failure = GatewayError::Transport {
            message: "Network error. Please try again.".to_string(),
        };
        assert!(app.finish_search(second, Err(failure)));
        assert!(!app.finish_search(first, Ok(vec![inception()])));

        assert_matches!(app.search_status(), SearchStatus::Error(msg) if msg == "Network error. Please try again.");
    }

    #[test]
    fn blank_search_supersedes_outstanding_request() {
        let mut app = controller();
        let first = app.begin_search("Inception").unwrap();
        assert!(app.begin_search("").is_none());

        assert!(!app.finish_search(first, Ok(vec![inception()])));
        assert_eq!(
            app.search_status(),
            &SearchStatus::Error(EMPTY_QUERY_MESSAGE.to_string())
        );
    }

    // -- Details --------------------------------------------------------------

    #[test]
    fn open_details_shows_loading_immediately() {
        let mut app = controller();
        let _ticket = app.open_details(42);

        assert!(app.details().is_open());
        assert_eq!(app.details(), &DetailsState::Loading { id: 42 });
    }

    #[tokio::test]
    async fn details_not_found_leaves_overlay_open_with_error() {
        let gateway = FakeGateway::default().with_details(
            999999,
            Err(GatewayError::Upstream {
                message: "TMDB request failed".to_string(),
                status: Some(404),
                details: Some("not found".to_string()),
            }),
        );
        let mut app = controller();

        app.show_details(&gateway, 999999).await;

        assert!(app.details().is_open());
        assert_eq!(
            app.details(),
            &DetailsState::Error {
                id: 999999,
                message: "TMDB request failed".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn details_success_is_loaded() {
        let gateway = FakeGateway::default().with_details(27205, Ok(details(27205, "Inception")));
        let mut app = controller();

        app.show_details(&gateway, 27205).await;

        assert_matches!(app.details(), DetailsState::Loaded { id: 27205, details } if details.title == "Inception");
        assert_eq!(gateway.details_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn late_response_for_previous_item_is_discarded() {
        let mut app = controller();
        let ticket_a = app.open_details(1);
        let ticket_b = app.open_details(2);

        assert!(app.finish_details(ticket_b, Ok(details(2, "B"))));
        assert!(!app.finish_details(ticket_a, Ok(details(1, "A"))));

        assert_matches!(app.details(), DetailsState::Loaded { id: 2, details } if details.title == "B");
    }

    #[test]
    fn late_response_after_close_is_discarded() {
        let mut app = controller();
        let ticket = app.open_details(1);
        app.close_details();

        assert!(!app.finish_details(ticket, Ok(details(1, "A"))));
        assert_eq!(app.details(), &DetailsState::Closed);
    }

    #[test]
    fn late_failure_does_not_replace_newer_item() {
        let mut app = controller();
        let ticket_a = app.open_details(1);
        let _ticket_b = app.open_details(2);

        assert!(!app.finish_details(
            ticket_a,
            Err(GatewayError::Transport {
                message: "Network error while loading details.".to_string(),
            })
        ));
        assert_eq!(app.details(), &DetailsState::Loading { id: 2 });
    }

    // -- Favorites ------------------------------------------------------------

    #[test]
    fn favoriting_twice_keeps_one_entry() {
        let mut app = controller();
        assert!(app.add_favorite(&inception()));
        assert!(!app.add_favorite(&inception()));
        assert_eq!(app.favorites().len(), 1);
    }

    #[test]
    fn removing_unknown_favorite_is_noop() {
        let mut app = controller();
        app.add_favorite(&inception());
        let before = app.favorites().clone();

        assert!(!app.remove_favorite(1));
        assert_eq!(app.favorites(), &before);
    }

    #[test]
    fn update_changes_only_rating_and_note() {
        let mut app = controller();
        app.add_favorite(&inception());

        let patch = FavoritePatch {
            rating: Some(Rating::new(5).unwrap()),
            note: Some("dreams within dreams".to_string()),
        };
        assert!(app.update_favorite(27205, patch));

        let entry = app.favorites().get(27205).unwrap();
        let original = inception();
        assert_eq!(entry.rating.get(), 5);
        assert_eq!(entry.note, "dreams within dreams");
        assert_eq!(entry.title, original.title);
        assert_eq!(entry.overview, original.overview);
        assert_eq!(entry.poster_path, original.poster_path);
        assert_eq!(entry.release_date, original.release_date);
    }

    #[test]
    fn mutations_are_visible_to_a_fresh_session() {
        let mut app = controller();
        app.add_favorite(&inception());
        app.add_favorite(&SearchResultItem {
            id: 603,
            title: "The Matrix".to_string(),
            release_date: Some("1999-03-30".to_string()),
            overview: String::new(),
            poster_path: None,
        });
        app.update_favorite(27205, FavoritePatch::note("rewatch"));
        app.update_favorite(603, FavoritePatch::rating(Rating::new(4).unwrap()));

        let reloaded = app.store().load();
        assert_eq!(&reloaded, app.favorites());
        let ids: Vec<_> = reloaded.iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![603, 27205]);
    }

    #[test]
    fn controller_loads_existing_favorites() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = AppController::new(JsonFileStore::open(dir.path()).unwrap());
        first.add_favorite(&inception());
        first.update_favorite(27205, FavoritePatch::rating(Rating::new(2).unwrap()));
        drop(first);

        let second = AppController::new(JsonFileStore::open(dir.path()).unwrap());
        assert!(second.is_favorite(27205));
        assert_eq!(second.favorites().get(27205).unwrap().rating.get(), 2);
    }

    #[test]
    fn storage_failure_keeps_session_state() {
        let mut app = AppController::new(MemoryStore::with_quota(8));
        assert!(app.add_favorite(&inception()));

        assert!(app.is_favorite(27205));
        assert!(app.store().load().is_empty());
    }
}
