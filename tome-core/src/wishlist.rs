use serde::{Deserialize, Serialize};

use crate::book::Book;

/// Pure data structure for the user's saved-book set.
///
/// Insertion-ordered for display, membership keyed by book id only. Entries
/// are snapshots captured at toggle time; later fetches never rewrite them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wishlist {
    entries: Vec<Book>,
}

impl Wishlist {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|b| b.id == id)
    }

    /// Add the book when absent, remove it when present.
    ///
    /// Returns true when the book ended up in the wishlist.
    pub fn toggle(&mut self, book: Book) -> bool {
        if self.contains(&book.id) {
            self.remove(&book.id);
            false
        } else {
            self.entries.push(book);
            true
        }
    }

    /// Remove the entry with the given id. No-op when absent.
    pub fn remove(&mut self, id: &str) {
        self.entries.retain(|b| b.id != id);
    }

    /// Entries in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
