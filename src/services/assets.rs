//! Cover image URL decoration.

use crate::models::book::Book;

/// Resolves `cover_photo` file ids into absolute asset URLs.
#[derive(Debug, Clone)]
pub struct AssetUrls {
    base_url: String,
}

impl AssetUrls {
    pub fn new(directus_url: &str) -> Self {
        Self {
            base_url: directus_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, file_id: &str) -> String {
        format!("{}/assets/{file_id}", self.base_url)
    }

    pub fn decorate(&self, mut book: Book) -> Book {
        book.image = book
            .cover_photo
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| self.url_for(id));
        book
    }

    pub fn decorate_all(&self, books: Vec<Book>) -> Vec<Book> {
        books.into_iter().map(|b| self.decorate(b)).collect()
    }
}
