//! Book record as stored in the `books` collection.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{default_true, null_as_default, null_as_true, opt_reference_id, reference_id};

pub const BOOKS_COLLECTION: &str = "books";

/// A catalogued book. Only `genre`, `cover_photo` and `user_created` are
/// interpreted by the listing controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "reference_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genre: String,
    #[serde(default)]
    pub publication_date: Option<String>,
    #[serde(default, deserialize_with = "opt_reference_id")]
    pub cover_photo: Option<String>,
    /// Absolute cover URL, filled in by the asset decorator.
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "opt_reference_id")]
    pub user_created: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
    #[serde(default = "default_true", deserialize_with = "null_as_true")]
    pub allow_comments: bool,
}

impl Book {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.user_created.as_deref() == Some(user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: String,
    #[validate(length(min = 1, max = 50, message = "Genre must be 1-50 characters"))]
    pub genre: String,
    #[validate(length(min = 1, message = "Publication date is required"))]
    pub publication_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(default = "default_true")]
    pub allow_comments: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Author must be 1-100 characters"))]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 50, message = "Genre must be 1-50 characters"))]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publication_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_comments: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_accepts_expanded_creator() {
        let book: Book = serde_json::from_value(json!({
            "id": "b-1",
            "title": "Dune",
            "author": "Frank Herbert",
            "genre": "Sci-Fi",
            "user_created": { "id": "u-1", "email": "kai@example.com" },
        }))
        .unwrap();
        assert_eq!(book.user_created.as_deref(), Some("u-1"));
        assert!(book.is_owned_by("u-1"));
        assert!(!book.is_owned_by(""));
        assert!(book.allow_comments);
    }

    #[test]
    fn book_tolerates_nulls_and_numeric_ids() {
        let book: Book = serde_json::from_value(json!({
            "id": 42,
            "title": null,
            "genre": null,
            "cover_photo": null,
            "allow_comments": null,
        }))
        .unwrap();
        assert_eq!(book.id, "42");
        assert_eq!(book.title, "");
        assert_eq!(book.genre, "");
        assert_eq!(book.cover_photo, None);
        assert!(book.allow_comments);
    }

    #[test]
    fn allow_comments_false_is_kept() {
        let book: Book =
            serde_json::from_value(json!({ "id": "b-2", "allow_comments": false })).unwrap();
        assert!(!book.allow_comments);
    }

    #[test]
    fn create_book_validation() {
        let valid = CreateBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Sci-Fi".to_string(),
            publication_date: "1965-08-01".to_string(),
            cover_photo: None,
            allow_comments: true,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateBook {
            title: String::new(),
            genre: "g".repeat(51),
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("title"));
        assert!(fields.contains_key("genre"));
    }

    #[test]
    fn update_book_serializes_only_present_fields() {
        let update = UpdateBook {
            title: Some("Dune Messiah".to_string()),
            allow_comments: Some(false),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "title": "Dune Messiah", "allow_comments": false })
        );
    }

    #[test]
    fn update_book_rejects_blank_title() {
        let update = UpdateBook {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
