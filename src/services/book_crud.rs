//! Single-book create, read, update and delete against the `books` collection.

use serde_json::Value;
use validator::Validate;

use crate::errors::AppError;
use crate::gateway::CollectionGateway;
use crate::models::book::{Book, CreateBook, UpdateBook, BOOKS_COLLECTION};
use crate::models::user::SessionUser;
use crate::services::assets::AssetUrls;

fn decode_book(item: Value, assets: &AssetUrls) -> Result<Book, AppError> {
    if item.is_null() {
        return Err(AppError::Internal(
            "Collection store returned no book".to_string(),
        ));
    }
    let book: Book = serde_json::from_value(item)
        .map_err(|e| AppError::Internal(format!("Malformed book record: {e}")))?;
    Ok(assets.decorate(book))
}

/// Find a book by id.
pub async fn get_by_id(
    gateway: &dyn CollectionGateway,
    assets: &AssetUrls,
    id: &str,
) -> Result<Book, AppError> {
    let item = gateway
        .get_by_id(BOOKS_COLLECTION, id, &["*"])
        .await?
        .ok_or_else(|| AppError::NotFound("Book not found".to_string()))?;
    decode_book(item, assets)
}

/// Create a new book owned by the caller's token.
pub async fn create(
    gateway: &dyn CollectionGateway,
    assets: &AssetUrls,
    input: &CreateBook,
) -> Result<Book, AppError> {
    input.validate()?;
    let item = serde_json::to_value(input)
        .map_err(|e| AppError::Internal(format!("Failed to encode book: {e}")))?;
    let created = gateway.create(BOOKS_COLLECTION, &item).await?;
    let book = decode_book(created, assets)?;
    tracing::info!(book_id = %book.id, title = %book.title, "Book created");
    Ok(book)
}

/// Apply a partial update to a book.
pub async fn update(
    gateway: &dyn CollectionGateway,
    assets: &AssetUrls,
    id: &str,
    input: &UpdateBook,
) -> Result<Book, AppError> {
    input.validate()?;
    let item = serde_json::to_value(input)
        .map_err(|e| AppError::Internal(format!("Failed to encode book: {e}")))?;
    let updated = gateway.update(BOOKS_COLLECTION, id, &item).await?;
    let book = decode_book(updated, assets)?;
    tracing::info!(book_id = %book.id, "Book updated");
    Ok(book)
}

pub async fn remove(gateway: &dyn CollectionGateway, id: &str) -> Result<(), AppError> {
    gateway.delete(BOOKS_COLLECTION, &[id.to_string()]).await?;
    tracing::info!(book_id = id, "Book deleted");
    Ok(())
}

/// Only the book's creator or an administrator may edit or delete it.
pub fn ensure_can_edit(
    book: &Book,
    user: &SessionUser,
    admin_role_id: Option<&str>,
) -> Result<(), AppError> {
    if book.is_owned_by(&user.id) || user.is_admin(admin_role_id) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the owner can modify this book".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::{failure, Call, MockGateway};
    use crate::models::user::Role;
    use serde_json::json;

    fn assets() -> AssetUrls {
        AssetUrls::new("http://cms.local")
    }

    fn new_book() -> CreateBook {
        CreateBook {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Sci-Fi".to_string(),
            publication_date: "1965-08-01".to_string(),
            cover_photo: Some("f-1".to_string()),
            allow_comments: true,
        }
    }

    fn user(id: &str, role_id: &str) -> SessionUser {
        SessionUser {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            first_name: None,
            last_name: None,
            role: Some(Role {
                id: role_id.to_string(),
                name: "Role".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn get_missing_book_is_not_found() {
        let gw = MockGateway::new();
        let err = get_by_id(&gw, &assets(), "nope").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn get_decorates_cover() {
        let gw = MockGateway::new();
        gw.push_get(Ok(Some(json!({ "id": "b-1", "title": "Dune", "cover_photo": "f-1" }))));
        let book = get_by_id(&gw, &assets(), "b-1").await.unwrap();
        assert_eq!(book.image.as_deref(), Some("http://cms.local/assets/f-1"));
    }

    #[tokio::test]
    async fn create_sends_validated_payload() {
        let gw = MockGateway::new();
        gw.push_create(Ok(json!({ "id": "b-9", "title": "Dune", "cover_photo": "f-1" })));

        let book = create(&gw, &assets(), &new_book()).await.unwrap();

        assert_eq!(book.id, "b-9");
        assert!(book.image.is_some());
        match &gw.calls()[0] {
            Call::Create(collection, item) => {
                assert_eq!(collection, "books");
                assert_eq!(item["allow_comments"], true);
                assert_eq!(item["genre"], "Sci-Fi");
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_book_never_reaches_store() {
        let gw = MockGateway::new();
        let mut input = new_book();
        input.title = String::new();

        let err = create(&gw, &assets(), &input).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(gw.calls().is_empty());
    }

    #[tokio::test]
    async fn create_propagates_store_failure() {
        let gw = MockGateway::new();
        gw.push_create(Err(failure()));
        let err = create(&gw, &assets(), &new_book()).await.unwrap_err();
        assert!(matches!(err, AppError::Gateway(_)));
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let gw = MockGateway::new();
        let patch = UpdateBook {
            allow_comments: Some(false),
            ..Default::default()
        };

        let book = update(&gw, &assets(), "b-1", &patch).await.unwrap();

        assert!(!book.allow_comments);
        assert_eq!(
            gw.calls(),
            vec![Call::Update(
                "books".into(),
                "b-1".into(),
                json!({ "allow_comments": false })
            )]
        );
    }

    #[tokio::test]
    async fn remove_deletes_by_id() {
        let gw = MockGateway::new();
        remove(&gw, "b-1").await.unwrap();
        assert_eq!(
            gw.calls(),
            vec![Call::Delete("books".into(), vec!["b-1".into()])]
        );
    }

    #[test]
    fn only_owner_or_admin_may_edit() {
        let book: Book =
            serde_json::from_value(json!({ "id": "b-1", "user_created": "u-1" })).unwrap();

        assert!(ensure_can_edit(&book, &user("u-1", "r-user"), Some("r-admin")).is_ok());
        assert!(ensure_can_edit(&book, &user("u-2", "r-admin"), Some("r-admin")).is_ok());
        assert!(matches!(
            ensure_can_edit(&book, &user("u-2", "r-user"), Some("r-admin")),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_edit(&book, &user("u-2", "r-admin"), None).is_err());
    }
}
