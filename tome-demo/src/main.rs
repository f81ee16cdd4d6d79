//! Interactive shell over the search session: type to search the Google
//! Books catalog, save results to an in-memory wishlist. State lives only
//! for the lifetime of the process.

use std::io::{self, BufRead};
use std::sync::Arc;

use tracing::info;

use tome_core::{GoogleBooks, SearchConfig, SearchSession, SessionState};

fn configure_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .init();
}

/// Whether the search-facing part of the state changed. Wishlist-only
/// mutations (a `:w` or `:rm`) should not reprint the result list.
fn search_view_changed(prev: &SessionState, next: &SessionState) -> bool {
    prev.settled_query != next.settled_query
        || prev.is_loading != next.is_loading
        || prev.results != next.results
}

fn print_results(state: &SessionState) {
    if state.is_loading {
        println!("Searching for '{}'...", state.settled_query);
        return;
    }
    if state.settled_query.is_empty() {
        return;
    }
    if state.results.is_empty() {
        println!("No books found. Try a different search term.");
        return;
    }
    for (i, book) in state.results.iter().enumerate() {
        let authors = if book.authors.is_empty() {
            "unknown author".to_string()
        } else {
            book.authors.join(", ")
        };
        let label = book
            .special_label
            .as_deref()
            .map(|l| format!(" [{}]", l))
            .unwrap_or_default();
        println!(
            "{:2}. {} — {} ({}){}",
            i + 1,
            book.title,
            authors,
            book.price.as_deref().unwrap_or(""),
            label
        );
    }
}

fn print_wishlist(state: &SessionState) {
    if state.wishlist.is_empty() {
        println!("Wishlist is empty.");
        return;
    }
    for book in state.wishlist.books() {
        println!("  {} — {}", book.id, book.title);
    }
}

fn toggle_by_index(session: &SearchSession, arg: &str) {
    let state = session.snapshot();
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= state.results.len() => {
            let book = &state.results[n - 1];
            session.toggle_wishlist(book);
            println!("Toggled '{}' ({}).", book.title, book.id);
        }
        _ => println!("No result number '{}'.", arg.trim()),
    }
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    configure_logging();
    let config = SearchConfig::from_env();
    info!("Using catalog endpoint {}", config.api_base);

    let gateway = Arc::new(GoogleBooks::from_config(&config));
    let session = SearchSession::new(gateway, config.debounce());
    let mut state_rx = session.subscribe();

    // Blocking stdin reader feeding the select loop below
    let (line_tx, mut line_rx) = tokio::sync::mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });

    println!("Type to search. Commands: :w <n> toggle wishlist, :rm <id> remove, :l list, :q quit.");
    let mut printed = session.snapshot();
    loop {
        tokio::select! {
            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = state_rx.borrow_and_update().clone();
                if search_view_changed(&printed, &state) {
                    print_results(&state);
                }
                printed = state;
            }
            line = line_rx.recv() => {
                let Some(line) = line else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == ":q" {
                    break;
                } else if line == ":l" {
                    print_wishlist(&session.snapshot());
                } else if let Some(arg) = line.strip_prefix(":w ") {
                    toggle_by_index(&session, arg);
                } else if let Some(id) = line.strip_prefix(":rm ") {
                    session.remove_from_wishlist(id.trim());
                } else {
                    session.change_query(line);
                }
            }
        }
    }
}
