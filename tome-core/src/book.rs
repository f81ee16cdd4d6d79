use serde::{Deserialize, Serialize};

/// A normalized catalog entry as shown to the user.
///
/// The gateway fills the catalog fields (everything up to `is_read`) with
/// defaults when the source response omits them; the session attaches the
/// optional listing fields after each fetch. Field names serialize in
/// camelCase for the presentation boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Catalog id, unique and stable per item. Never empty.
    pub id: String,
    pub title: String,
    pub authors: Vec<String>,
    pub publisher: String,
    pub published_date: String,
    /// Cover image URL, empty when the catalog has none. Consumers substitute
    /// a placeholder for an empty or broken URL.
    pub cover_url: String,
    pub description: String,
    pub is_read: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_label: Option<String>,
    /// Reserved: no code path populates a rating yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
}

/// Title sentinel used when the catalog omits one.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

impl Book {
    /// A record with catalog defaults for every field except the id.
    pub fn with_defaults(id: impl Into<String>) -> Self {
        Book {
            id: id.into(),
            title: UNKNOWN_TITLE.to_string(),
            authors: Vec::new(),
            publisher: String::new(),
            published_date: String::new(),
            cover_url: String::new(),
            description: String::new(),
            is_read: false,
            price: None,
            condition: None,
            discount: None,
            delivery_info: None,
            special_label: None,
            rating: None,
        }
    }
}
