//! Comments on a single book, gated by the book's `allow_comments` flag.
//!
//! The flag cached here only mirrors the store's own permission rule so a
//! disabled thread can be refused before any request; the store still
//! enforces it authoritatively.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use validator::Validate;

use crate::errors::AppError;
use crate::gateway::{CollectionGateway, GatewayResult, ItemQuery, Predicate, SortKey};
use crate::models::book::BOOKS_COLLECTION;
use crate::models::comment::{Comment, CreateComment, COMMENTS_COLLECTION, COMMENT_FIELDS};

#[derive(Debug, Clone, Serialize)]
pub struct CommentsView {
    pub can_comment: bool,
    pub comments: Vec<Comment>,
    #[serde(skip_serializing)]
    pub loading: bool,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

#[derive(Debug, Default)]
struct CommentsState {
    comments: Vec<Comment>,
    can_comment: bool,
    loading: bool,
    last_error: Option<String>,
    generation: u64,
}

pub struct CommentGate {
    gateway: Arc<dyn CollectionGateway>,
    book_id: String,
    state: Mutex<CommentsState>,
}

impl CommentGate {
    /// Writes stay refused until a fetch has reported the book's flag.
    pub fn new(gateway: Arc<dyn CollectionGateway>, book_id: impl Into<String>) -> Self {
        Self {
            gateway,
            book_id: book_id.into(),
            state: Mutex::new(CommentsState::default()),
        }
    }

    pub fn book_id(&self) -> &str {
        &self.book_id
    }

    /// Load the permission flag and the comments together. Both reads must
    /// succeed for either to be shown; a failure is kept in `last_error`.
    pub async fn fetch_comments(&self) {
        let _ = self.refresh().await;
    }

    /// Reload the thread ahead of a write. A failed read is returned as the
    /// store's error so it is not mistaken for a thread closed to comments.
    pub async fn fetch_for_write(&self) -> Result<(), AppError> {
        self.refresh().await.map_err(AppError::from)
    }

    /// Superseded fetches report success; the newer one owns the outcome.
    async fn refresh(&self) -> GatewayResult<()> {
        let generation = {
            let mut state = self.state.lock().await;
            state.generation += 1;
            state.loading = true;
            state.generation
        };

        let query = ItemQuery::new()
            .filter(Predicate::eq("book_id", self.book_id.as_str()))
            .sort(SortKey::desc("date_created"))
            .fields(COMMENT_FIELDS);

        let result = tokio::try_join!(
            self.gateway
                .get_by_id(BOOKS_COLLECTION, &self.book_id, &["allow_comments"]),
            self.gateway.query(COMMENTS_COLLECTION, &query),
        );

        let mut state = self.state.lock().await;
        if state.generation != generation {
            tracing::debug!(book_id = %self.book_id, "Discarding stale comments");
            return Ok(());
        }
        state.loading = false;

        let decoded = result.and_then(|(book, page)| {
            let comments = match page {
                Some(page) => page.decode::<Comment>()?,
                None => Vec::new(),
            };
            Ok((allow_comments(book.as_ref()), comments))
        });

        match decoded {
            Ok((can_comment, comments)) => {
                state.can_comment = can_comment;
                state.comments = comments.into_iter().map(Comment::normalized).collect();
                state.last_error = None;
                tracing::debug!(
                    book_id = %self.book_id,
                    can_comment,
                    count = state.comments.len(),
                    "Fetched comments"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(book_id = %self.book_id, error = %e, "Failed to fetch comments");
                state.comments.clear();
                state.can_comment = false;
                state.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Post a comment, then reload the thread.
    pub async fn add_comment(&self, input: &CreateComment) -> Result<(), AppError> {
        if !self.can_comment().await {
            return Err(AppError::CommentsDisabled);
        }
        input.validate()?;

        let item = json!({
            "content": input.content,
            "book_id": self.book_id,
            "author_name": input.author_name,
        });
        self.gateway.create(COMMENTS_COLLECTION, &item).await?;
        tracing::info!(book_id = %self.book_id, "Comment added");

        self.fetch_comments().await;
        Ok(())
    }

    pub async fn delete_comment(&self, comment_id: &str) -> Result<(), AppError> {
        self.gateway
            .delete(COMMENTS_COLLECTION, &[comment_id.to_string()])
            .await?;
        self.state
            .lock()
            .await
            .comments
            .retain(|c| c.id != comment_id);
        tracing::info!(book_id = %self.book_id, comment_id, "Comment deleted");
        Ok(())
    }

    pub async fn can_comment(&self) -> bool {
        self.state.lock().await.can_comment
    }

    pub async fn set_can_comment(&self, allowed: bool) {
        self.state.lock().await.can_comment = allowed;
    }

    pub async fn snapshot(&self) -> CommentsView {
        let state = self.state.lock().await;
        CommentsView {
            can_comment: state.can_comment,
            comments: state.comments.clone(),
            loading: state.loading,
            last_error: state.last_error.clone(),
        }
    }
}

fn allow_comments(book: Option<&Value>) -> bool {
    book.and_then(|b| b.get("allow_comments"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
