//! Reader comments attached to a book.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{null_as_default, reference_id};

pub const COMMENTS_COLLECTION: &str = "comments";

/// Fields requested when listing comments; the creator is expanded to its id.
pub const COMMENT_FIELDS: [&str; 6] = [
    "id",
    "user_created.id",
    "date_created",
    "author_name",
    "content",
    "book_id",
];

const ANONYMOUS: &str = "Anonymous";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(deserialize_with = "reference_id")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(default, deserialize_with = "reference_id")]
    pub book_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author_name: String,
    #[serde(default, deserialize_with = "reference_id")]
    pub user_created: String,
    #[serde(default)]
    pub date_created: Option<String>,
}

impl Comment {
    /// Fill presentation defaults for fields the store left blank.
    pub fn normalized(mut self) -> Self {
        if self.author_name.trim().is_empty() {
            self.author_name = ANONYMOUS.to_string();
        }
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, max = 2000, message = "Comment must be 1-2000 characters"))]
    pub content: String,
    #[validate(length(min = 1, max = 100, message = "Author name must be 1-100 characters"))]
    pub author_name: String,
}
