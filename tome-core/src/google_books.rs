use std::sync::OnceLock;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::book::{Book, UNKNOWN_TITLE};
use crate::config::SearchConfig;
use crate::gateway::{BookGateway, GatewayError};

/// Shared HTTP client for all Google Books requests.
fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .user_agent("tome/1.0")
            .build()
            .expect("Failed to create HTTP client")
    })
}

/// Google Books volumes gateway.
pub struct GoogleBooks {
    api_base: String,
    max_results: u32,
}

impl GoogleBooks {
    pub fn new() -> Self {
        Self::from_config(&SearchConfig::default())
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        GoogleBooks {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            max_results: config.max_results,
        }
    }

    fn volumes_url(&self, query: &str) -> String {
        format!(
            "{}/volumes?q={}&maxResults={}",
            self.api_base,
            urlencoding::encode(query),
            self.max_results
        )
    }

    async fn fetch_volumes(&self, query: &str) -> Result<Vec<Book>, GatewayError> {
        let url = self.volumes_url(query);
        debug!("Google Books request: {}", url);
        let response = http_client()
            .get(&url)
            .header("content-type", "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            warn!("Google Books error response ({}): {}", status, error_text);
            return Err(GatewayError::Status(status));
        }
        let json: Value = response.json().await?;
        Ok(parse_volumes(&json))
    }
}

impl Default for GoogleBooks {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookGateway for GoogleBooks {
    async fn search(&self, query: &str) -> Vec<Book> {
        match self.fetch_volumes(query).await {
            Ok(books) => {
                info!("✓ Google Books found {} volume(s) for '{}'", books.len(), query);
                books
            }
            Err(e) => {
                warn!("Book search failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }
}

/// Normalize a volumes response into book records.
///
/// Defensive on shape: a missing `items` array yields an empty list, and an
/// item missing its `volumeInfo` block entirely still yields a record built
/// from defaults. Items without a usable id are skipped, never invented.
pub fn parse_volumes(json: &Value) -> Vec<Book> {
    let mut books = Vec::new();
    if let Some(items) = json.get("items").and_then(|i| i.as_array()) {
        for item in items {
            let Some(id) = item
                .get("id")
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
            else {
                continue;
            };
            let info = item.get("volumeInfo");
            let mut book = Book::with_defaults(id);
            book.title = info
                .and_then(|v| v.get("title"))
                .and_then(|v| v.as_str())
                .unwrap_or(UNKNOWN_TITLE)
                .to_string();
            book.authors = info
                .and_then(|v| v.get("authors"))
                .and_then(|v| v.as_array())
                .map(|arr| {
                    arr.iter()
                        .filter_map(|a| a.as_str().map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            book.publisher = text_field(info, "publisher");
            book.published_date = text_field(info, "publishedDate");
            book.description = text_field(info, "description");
            book.cover_url = info
                .and_then(|v| v.get("imageLinks"))
                .and_then(|links| links.get("thumbnail"))
                .and_then(|v| v.as_str())
                .map(force_https)
                .unwrap_or_default();
            books.push(book);
        }
    }
    books
}

fn text_field(info: Option<&Value>, key: &str) -> String {
    info.and_then(|v| v.get(key))
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Google Books thumbnail links come back with a plain http scheme.
fn force_https(url: &str) -> String {
    match url.strip_prefix("http://") {
        Some(rest) => format!("https://{}", rest),
        None => url.to_string(),
    }
}
