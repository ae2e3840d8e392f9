//! Genre catalogue derived from the books on record.

use std::collections::BTreeSet;

use crate::gateway::{CollectionGateway, ItemQuery};
use crate::models::book::{Book, BOOKS_COLLECTION};

/// Unique, non-blank genres in ascending order.
pub fn extract_genres<I, S>(genres: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    genres
        .into_iter()
        .filter(|g| !g.as_ref().trim().is_empty())
        .map(|g| g.as_ref().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Genres of an already loaded set of books.
pub fn genres_of(books: &[Book]) -> Vec<String> {
    extract_genres(books.iter().map(|b| b.genre.as_str()))
}

/// Every genre in use. A failed read yields an empty catalogue.
pub async fn fetch_genres(gateway: &dyn CollectionGateway) -> Vec<String> {
    let query = ItemQuery::new().fields(["genre"]).unlimited();
    let books = match gateway.query(BOOKS_COLLECTION, &query).await {
        Ok(Some(page)) => page.decode::<GenreOnly>(),
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch genres");
            return Vec::new();
        }
    };

    match books {
        Ok(rows) => extract_genres(rows.into_iter().filter_map(|r| r.genre)),
        Err(e) => {
            tracing::error!(error = %e, "Malformed genre rows");
            Vec::new()
        }
    }
}

/// Projection requested by [`fetch_genres`]; rows carry no id.
#[derive(Debug, serde::Deserialize)]
struct GenreOnly {
    #[serde(default)]
    genre: Option<String>,
}
