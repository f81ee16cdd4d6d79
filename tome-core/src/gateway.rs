use async_trait::async_trait;
use thiserror::Error;

use crate::book::Book;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Catalog API returned status {0}")]
    Status(reqwest::StatusCode),
}

/// Boundary translating free-text queries into external catalog calls.
///
/// Implementations handle their own failures: transport errors, non-2xx
/// statuses, and malformed payloads all resolve to an empty list rather than
/// surfacing to the caller. "No results" and "request failed" are therefore
/// indistinguishable at this seam.
#[async_trait]
pub trait BookGateway: Send + Sync {
    async fn search(&self, query: &str) -> Vec<Book>;
}
