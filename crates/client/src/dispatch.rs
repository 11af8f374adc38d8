//! Background execution of gateway calls.
//!
//! [`RequestDispatcher`] runs each search or detail request on its own Tokio
//! task and reports the outcome as a [`Completion`] over an mpsc channel. The
//! front end keeps reading input while requests are outstanding and applies
//! completions to the [`AppController`] as they arrive; the controller's
//! tickets decide whether a completion is still current.

use std::sync::Arc;

use marquee_core::storage::KeyValueStore;
use marquee_core::types::{ItemDetails, SearchResultItem};
use tokio::sync::mpsc;

use crate::controller::{AppController, DetailsTicket, SearchTicket};
use crate::gateway::{GatewayError, MovieGateway};

/// A finished gateway call, paired with the ticket it was issued under.
#[derive(Debug)]
pub enum Completion {
    Search {
        ticket: SearchTicket,
        outcome: Result<Vec<SearchResultItem>, GatewayError>,
    },
    Details {
        ticket: DetailsTicket,
        outcome: Result<ItemDetails, GatewayError>,
    },
}

impl Completion {
    /// Apply to the controller. Returns `false` when the outcome was stale
    /// and discarded.
    pub fn apply<S: KeyValueStore>(self, app: &mut AppController<S>) -> bool {
        match self {
            Completion::Search { ticket, outcome } => app.finish_search(ticket, outcome),
            Completion::Details { ticket, outcome } => app.finish_details(ticket, outcome),
        }
    }
}

/// Spawns gateway calls and funnels their outcomes into one channel.
pub struct RequestDispatcher<G: ?Sized> {
    gateway: Arc<G>,
    tx: mpsc::UnboundedSender<Completion>,
}

impl<G> RequestDispatcher<G>
where
    G: MovieGateway + ?Sized + 'static,
{
    /// Create a dispatcher and the receiver its completions arrive on.
    pub fn new(gateway: Arc<G>) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { gateway, tx }, rx)
    }

    /// Run the search described by `ticket` in the background.
    pub fn search(&self, ticket: SearchTicket) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.search(ticket.query()).await;
            if tx.send(Completion::Search { ticket, outcome }).is_err() {
                tracing::debug!("Search completed after the front end stopped listening");
            }
        });
    }

    /// Load the movie described by `ticket` in the background.
    pub fn details(&self, ticket: DetailsTicket) {
        let gateway = Arc::clone(&self.gateway);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = gateway.movie_details(ticket.id()).await;
            if tx.send(Completion::Details { ticket, outcome }).is_err() {
                tracing::debug!(id = ticket.id(), "Details completed after the front end stopped listening");
            }
        });
    }
}
