use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rand::Rng;
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::book::Book;
use crate::debounce::Debouncer;
use crate::gateway::BookGateway;
use crate::wishlist::Wishlist;

/// One snapshot of the search session, as consumed by presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// The text the user is actively editing.
    pub raw_query: String,
    /// The query that survived the quiet period and triggered the last fetch.
    pub settled_query: String,
    /// Last applied result list, replaced wholesale per fetch.
    pub results: Vec<Book>,
    pub wishlist: Wishlist,
    /// True exactly while the fetch for the current settled query is
    /// outstanding.
    pub is_loading: bool,
}

struct SessionInner {
    state_tx: watch::Sender<SessionState>,
    gateway: Arc<dyn BookGateway>,
    debouncer: Mutex<Debouncer<String>>,
    /// Fetch generation, bumped per dispatched fetch. A resolution is applied
    /// only while its generation is still current (last-dispatched-wins).
    generation: AtomicU64,
}

/// The session orchestrator: owns the canonical search and wishlist state,
/// wires the debouncer to the gateway, and exposes intent handlers.
///
/// All state transitions are atomic snapshot swaps on a `watch` channel;
/// readers subscribe and always observe a consistent `SessionState`.
/// Dropping the session aborts the driver task and any pending debounce
/// timer. In-flight fetches are not aborted at the transport level, but
/// their results are discarded by the generation guard.
pub struct SearchSession {
    inner: Arc<SessionInner>,
    driver: JoinHandle<()>,
}

impl std::fmt::Debug for SearchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchSession")
            .field("state", &*self.inner.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl SearchSession {
    /// Must be called from within a tokio runtime; the session spawns its
    /// driver task on it.
    pub fn new(gateway: Arc<dyn BookGateway>, debounce: Duration) -> Self {
        let (state_tx, _) = watch::channel(SessionState::default());
        let debouncer = Debouncer::new(String::new(), debounce);
        let settled = debouncer.settled();
        let inner = Arc::new(SessionInner {
            state_tx,
            gateway,
            debouncer: Mutex::new(debouncer),
            generation: AtomicU64::new(0),
        });
        let driver = tokio::spawn(drive(Arc::clone(&inner), settled));
        SearchSession { inner, driver }
    }

    /// Update the raw query for immediate typing feedback and re-arm the
    /// debouncer. Never dispatches a fetch by itself.
    pub fn change_query(&self, text: &str) {
        self.inner
            .state_tx
            .send_modify(|state| state.raw_query = text.to_string());
        self.inner
            .debouncer
            .lock()
            .unwrap()
            .update(text.to_string());
    }

    /// Add the book to the wishlist when absent, remove it when present.
    ///
    /// The stored entry is a snapshot of the book as passed in; later fetches
    /// never rewrite it.
    pub fn toggle_wishlist(&self, book: &Book) {
        self.inner.state_tx.send_modify(|state| {
            state.wishlist.toggle(book.clone());
        });
    }

    /// Remove a wishlist entry by id. No-op when absent.
    pub fn remove_from_wishlist(&self, id: &str) {
        self.inner
            .state_tx
            .send_modify(|state| state.wishlist.remove(id));
    }

    /// Subscribe to state snapshots; presentation re-renders on change.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state_tx.subscribe()
    }

    pub fn snapshot(&self) -> SessionState {
        self.inner.state_tx.borrow().clone()
    }
}

impl Drop for SearchSession {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

/// Driver: reacts to each settled query, dispatching a tagged fetch.
async fn drive(inner: Arc<SessionInner>, mut settled: watch::Receiver<String>) {
    while settled.changed().await.is_ok() {
        let query = settled.borrow_and_update().clone();
        if query.trim().is_empty() {
            // Box cleared, not "search for nothing": keep prior results and
            // leave any in-flight fetch as the last-dispatched one.
            debug!("Blank settled query, keeping previous results");
            continue;
        }
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        inner.state_tx.send_modify(|state| {
            state.settled_query = query.clone();
            state.is_loading = true;
        });
        info!("Searching catalog for '{}'", query);
        let fetch = Arc::clone(&inner);
        tokio::spawn(async move {
            let books = fetch.gateway.search(&query).await;
            let results = decorate(books);
            // The generation check must happen inside the mutation: the
            // watch sender serializes closures, so check and apply stay
            // atomic even when fetch tasks resolve on different workers.
            let applied = fetch.state_tx.send_if_modified(|state| {
                if fetch.generation.load(Ordering::SeqCst) == generation {
                    state.results = results;
                    state.is_loading = false;
                    true
                } else {
                    false
                }
            });
            if !applied {
                debug!("Discarded stale results for '{}'", query);
            }
        });
    }
}

const PRICES: [&str; 4] = ["£3.65", "£2.86", "£3.61", "£9.99"];
const CONDITIONS: [&str; 2] = ["Pre-owned", "Brand new"];
const DISCOUNT: &str = "Buy 1, get 1 20% off";
const DELIVERY_INFO: &str = "Free delivery in 3 days";
const SPECIAL_LABEL: &str = "GREAT PRICE";

/// Attach the decorative listing fields, re-derived freshly per fetch.
fn decorate(books: Vec<Book>) -> Vec<Book> {
    let mut rng = rand::rng();
    books
        .into_iter()
        .map(|mut book| {
            book.price = Some(PRICES[rng.random_range(0..PRICES.len())].to_string());
            book.condition = Some(CONDITIONS[rng.random_range(0..CONDITIONS.len())].to_string());
            book.discount = Some(DISCOUNT.to_string());
            book.delivery_info = Some(DELIVERY_INFO.to_string());
            book.special_label = (rng.random::<f64>() > 0.75).then(|| SPECIAL_LABEL.to_string());
            book
        })
        .collect()
}
