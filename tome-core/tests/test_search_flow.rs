//! End-to-end tests for the debounced search pipeline: keystrokes through
//! the debouncer into gateway fetches and applied results, on a paused
//! tokio clock.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tome_core::{Book, BookGateway, SearchSession};

/// Initialize tracing for tests
fn tracing_init() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_line_number(true)
        .with_target(false)
        .with_file(true)
        .try_init();
}

/// Gateway returning one canned result per query, with per-query resolution
/// delays so tests can force fetches to overlap and resolve out of order.
struct ScriptedGateway {
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn new(delays: &[(&str, u64)]) -> Arc<Self> {
        Arc::new(ScriptedGateway {
            delays: delays
                .iter()
                .map(|(q, ms)| (q.to_string(), Duration::from_millis(*ms)))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BookGateway for ScriptedGateway {
    async fn search(&self, query: &str) -> Vec<Book> {
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        vec![Book::with_defaults(format!("{}-result", query))]
    }
}

fn result_ids(session: &SearchSession) -> Vec<String> {
    session
        .snapshot()
        .results
        .iter()
        .map(|b| b.id.clone())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_exactly_one_fetch() {
    tracing_init();
    let gateway = ScriptedGateway::new(&[]);
    let session = SearchSession::new(gateway.clone(), Duration::from_millis(100));

    session.change_query("type");
    tokio::time::sleep(Duration::from_millis(50)).await;
    session.change_query("typescript");
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(gateway.calls(), vec!["typescript"]);
    let state = session.snapshot();
    assert_eq!(state.settled_query, "typescript");
    assert!(!state.is_loading);
    assert_eq!(result_ids(&session), vec!["typescript-result"]);
}

#[tokio::test(start_paused = true)]
async fn stale_fetch_never_overwrites_newer_results() {
    tracing_init();
    // "a" resolves long after "ab" despite being dispatched first
    let gateway = ScriptedGateway::new(&[("a", 500), ("ab", 10)]);
    let session = SearchSession::new(gateway.clone(), Duration::from_millis(100));

    session.change_query("a");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(session.snapshot().is_loading, "fetch for 'a' should be in flight");

    session.change_query("ab");
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(result_ids(&session), vec!["ab-result"]);
    assert!(!session.snapshot().is_loading);

    // Let the stale fetch for "a" resolve; it must be discarded
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(result_ids(&session), vec!["ab-result"]);
    assert_eq!(gateway.calls(), vec!["a", "ab"]);
}

#[tokio::test(start_paused = true)]
async fn overlapping_fetches_apply_only_the_last_dispatched() {
    tracing_init();
    // Three overlapping fetches resolving in reverse dispatch order
    let gateway = ScriptedGateway::new(&[("a", 900), ("ab", 500), ("abc", 50)]);
    let session = SearchSession::new(gateway.clone(), Duration::from_millis(100));

    session.change_query("a");
    tokio::time::sleep(Duration::from_millis(150)).await;
    session.change_query("ab");
    tokio::time::sleep(Duration::from_millis(150)).await;
    session.change_query("abc");
    tokio::time::sleep(Duration::from_millis(1200)).await;

    assert_eq!(gateway.calls(), vec!["a", "ab", "abc"]);
    assert_eq!(result_ids(&session), vec!["abc-result"]);
    assert!(!session.snapshot().is_loading);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn last_dispatched_wins_across_worker_threads() {
    tracing_init();
    // Real clock and real workers: the slow first fetch resolves while the
    // fast second one may be applying on another thread. The second query's
    // results must survive regardless of how the resolutions interleave.
    let gateway = ScriptedGateway::new(&[("slow", 300), ("fast", 30)]);
    let session = SearchSession::new(gateway.clone(), Duration::from_millis(5));

    session.change_query("slow");
    tokio::time::sleep(Duration::from_millis(100)).await;
    session.change_query("fast");
    tokio::time::sleep(Duration::from_millis(600)).await;

    assert_eq!(gateway.calls(), vec!["slow", "fast"]);
    assert_eq!(result_ids(&session), vec!["fast-result"]);
    assert!(!session.snapshot().is_loading);
}

#[tokio::test(start_paused = true)]
async fn blank_settle_fetches_nothing_and_keeps_results() {
    tracing_init();
    let gateway = ScriptedGateway::new(&[]);
    let session = SearchSession::new(gateway.clone(), Duration::from_millis(100));

    session.change_query("rust");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(result_ids(&session), vec!["rust-result"]);

    // Clearing the box is not a search for the empty string
    session.change_query("   ");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = session.snapshot();
    assert_eq!(state.raw_query, "   ");
    assert_eq!(state.settled_query, "rust");
    assert_eq!(result_ids(&session), vec!["rust-result"]);
    assert!(!state.is_loading);
    assert_eq!(gateway.calls(), vec!["rust"]);
}

#[tokio::test(start_paused = true)]
async fn loading_flag_tracks_the_outstanding_fetch() {
    tracing_init();
    let gateway = ScriptedGateway::new(&[("dune", 200)]);
    let session = SearchSession::new(gateway, Duration::from_millis(100));

    session.change_query("dune");
    assert!(!session.snapshot().is_loading, "no fetch before settle");

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(session.snapshot().is_loading);

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!session.snapshot().is_loading);
}

#[tokio::test(start_paused = true)]
async fn applied_results_carry_decorative_listing_fields() {
    tracing_init();
    let gateway = ScriptedGateway::new(&[]);
    let session = SearchSession::new(gateway, Duration::from_millis(100));

    session.change_query("dune");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = session.snapshot();
    let book = &state.results[0];
    assert!(book.price.is_some());
    assert!(book.condition.is_some());
    assert_eq!(book.discount.as_deref(), Some("Buy 1, get 1 20% off"));
    assert_eq!(book.delivery_info.as_deref(), Some("Free delivery in 3 days"));
}

#[tokio::test(start_paused = true)]
async fn wishlist_entries_are_snapshots_not_live_references() {
    tracing_init();
    let gateway = ScriptedGateway::new(&[]);
    let session = SearchSession::new(gateway, Duration::from_millis(100));

    session.change_query("rust");
    tokio::time::sleep(Duration::from_millis(300)).await;
    let saved = session.snapshot().results[0].clone();
    session.toggle_wishlist(&saved);

    // A later fetch replaces the result list wholesale
    session.change_query("python");
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(result_ids(&session), vec!["python-result"]);

    let state = session.snapshot();
    assert_eq!(state.wishlist.len(), 1);
    assert_eq!(state.wishlist.books()[0], saved);
}

/// Stand-in for a gateway whose request failed: per the gateway contract the
/// failure is swallowed into an empty list before it reaches the session.
struct EmptyGateway;

#[async_trait]
impl BookGateway for EmptyGateway {
    async fn search(&self, _query: &str) -> Vec<Book> {
        Vec::new()
    }
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_surfaces_as_empty_results_not_an_error() {
    tracing_init();
    let session = SearchSession::new(Arc::new(EmptyGateway), Duration::from_millis(100));

    session.change_query("anything");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let state = session.snapshot();
    assert!(state.results.is_empty());
    assert!(!state.is_loading);
}
