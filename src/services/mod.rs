//! Business logic services.

pub mod admin;
pub mod assets;
pub mod auth;
pub mod book_crud;
pub mod book_list;
pub mod comments;
pub mod filters;
pub mod genres;
pub mod session;
pub mod user_books;
