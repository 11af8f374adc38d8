//! Interactive Marquee client.
//!
//! Reads commands from stdin, dispatches them to the controller, and prints
//! the affected part of the UI after each one. Network calls run in the
//! background, so input keeps being read while they are outstanding and
//! their outcomes are printed when they arrive. Logs go to stderr.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use marquee_client::command::{Command, HELP};
use marquee_client::config::ClientConfig;
use marquee_client::controller::AppController;
use marquee_client::dispatch::{Completion, RequestDispatcher};
use marquee_client::gateway::{HttpGateway, MovieGateway};
use marquee_client::view::{self, DetailsPanel, NO_FAVORITES};
use marquee_core::error::CoreError;
use marquee_core::favorites::FavoritePatch;
use marquee_core::storage::{KeyValueStore, LocalStore};
use marquee_core::types::MovieId;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "marquee_client=info,marquee_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = ClientConfig::from_env();
    tracing::info!(api_url = %config.api_url, data_dir = %config.data_dir.display(), "Loaded client configuration");

    // --- Gateway ---
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .expect("Failed to build HTTP client");
    let gateway = HttpGateway::with_client(http, config.api_url.clone());
    let (dispatcher, mut completions) = RequestDispatcher::new(Arc::new(gateway));
    // Dropped at end of input so the completion channel closes once the
    // outstanding requests have reported.
    let mut requests = Some(dispatcher);

    // --- Controller ---
    let mut app = AppController::new(LocalStore::open(config.data_dir.clone()));

    println!("Marquee. Favorites: {}. Type 'help' for commands.", app.favorites().len());
    println!("{}", view::SEARCH_HINT);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line(), if requests.is_some() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        requests = None;
                        continue;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to read stdin");
                        break;
                    }
                };

                let command = match Command::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        println!("{}", user_message(&e));
                        continue;
                    }
                };

                if command == Command::Quit {
                    break;
                }
                if let Some(requests) = &requests {
                    if let Err(e) = dispatch(&mut app, requests, command) {
                        println!("{}", user_message(&e));
                    }
                }
            }
            completion = completions.recv() => {
                let Some(completion) = completion else {
                    break;
                };
                let is_search = matches!(completion, Completion::Search { .. });
                if completion.apply(&mut app) {
                    if is_search {
                        print_results(&app);
                    } else {
                        print_details(&app);
                    }
                }
            }
        }
    }
}

/// Apply one command and print the part of the UI it affects.
///
/// Network-bound commands only issue the request here; the outcome is
/// printed once its completion arrives.
fn dispatch<S: KeyValueStore, G: MovieGateway + ?Sized + 'static>(
    app: &mut AppController<S>,
    requests: &RequestDispatcher<G>,
    command: Command,
) -> Result<(), CoreError> {
    match command {
        Command::Search(query) => {
            if let Some(ticket) = app.begin_search(&query) {
                requests.search(ticket);
            }
            print_results(app);
        }
        Command::Results => print_results(app),
        Command::Details(id) => {
            requests.details(app.open_details(id));
            print_details(app);
        }
        Command::Close => app.close_details(),
        Command::Favorite(id) => {
            let item = app.result(id).cloned().ok_or(CoreError::NotFound {
                entity: "Search result",
                id,
            })?;
            if !app.add_favorite(&item) {
                println!("{} is already a favorite.", item.title);
            }
            print_favorites(app);
        }
        Command::Unfavorite(id) => {
            if !app.remove_favorite(id) {
                return Err(CoreError::NotFound {
                    entity: "Favorite",
                    id,
                });
            }
            print_favorites(app);
        }
        Command::Rate(id, rating) => {
            update(app, id, FavoritePatch::rating(rating))?;
            print_favorites(app);
        }
        Command::Note(id, text) => {
            update(app, id, FavoritePatch::note(text))?;
            print_favorites(app);
        }
        Command::Favorites => print_favorites(app),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn update<S: KeyValueStore>(
    app: &mut AppController<S>,
    id: MovieId,
    patch: FavoritePatch,
) -> Result<(), CoreError> {
    if !app.is_favorite(id) {
        return Err(CoreError::NotFound {
            entity: "Favorite",
            id,
        });
    }
    app.update_favorite(id, patch);
    Ok(())
}

fn print_results<S: KeyValueStore>(app: &AppController<S>) {
    if let Some(notice) = view::search_notice(app) {
        println!("{notice}");
    }
    for card in view::result_cards(app) {
        println!("{card}");
    }
}

fn print_favorites<S: KeyValueStore>(app: &AppController<S>) {
    let cards = view::favorite_cards(app);
    println!("Favorites: {}", cards.len());
    if cards.is_empty() {
        println!("{NO_FAVORITES}");
    }
    for card in cards {
        println!("{card}");
    }
}

fn print_details<S: KeyValueStore>(app: &AppController<S>) {
    let panel = view::details_panel(app);
    if panel != DetailsPanel::Hidden {
        println!("{panel}");
    }
}

/// Validation messages are shown bare; other errors use their display form.
fn user_message(err: &CoreError) -> String {
    match err {
        CoreError::Validation(msg) => msg.clone(),
        other => other.to_string(),
    }
}
