//! In-memory book search with a debounced query pipeline and a wishlist.
//!
//! A [`SearchSession`] owns the canonical state for one browsing session:
//! the query the user is typing, the debounced query that actually hits the
//! catalog, the last result list, and the wishlist. Data comes from a
//! [`BookGateway`] implementation (the production one, [`GoogleBooks`],
//! talks to the Google Books volumes API); everything is discarded when the
//! session is dropped.

pub mod book;
pub mod config;
pub mod debounce;
pub mod gateway;
pub mod google_books;
pub mod session;
pub mod wishlist;

pub use book::Book;
pub use config::SearchConfig;
pub use debounce::Debouncer;
pub use gateway::{BookGateway, GatewayError};
pub use google_books::GoogleBooks;
pub use session::{SearchSession, SessionState};
pub use wishlist::Wishlist;
