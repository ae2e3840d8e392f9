use std::env;
use std::time::Duration;

use crate::services::{book_list, user_books};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directus_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    pub admin_role_id: Option<String>,
    pub books_page_size: u64,
    pub user_books_page_size: u64,
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            directus_url: env::var("DIRECTUS_URL")?,
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            admin_role_id: env::var("ADMIN_ROLE_ID")
                .ok()
                .filter(|id| !id.trim().is_empty()),
            books_page_size: env::var("BOOKS_PAGE_SIZE")
                .unwrap_or_else(|_| book_list::DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(book_list::DEFAULT_PAGE_SIZE),
            user_books_page_size: env::var("USER_BOOKS_PAGE_SIZE")
                .unwrap_or_else(|_| user_books::DEFAULT_PAGE_SIZE.to_string())
                .parse()
                .unwrap_or(user_books::DEFAULT_PAGE_SIZE),
            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }

    /// Configuration pointing at `directus_url` with every other setting at its default.
    pub fn for_directus(directus_url: impl Into<String>) -> Self {
        Self {
            directus_url: directus_url.into(),
            host: "127.0.0.1".to_string(),
            port: 0,
            frontend_url: "http://localhost:3001".to_string(),
            admin_role_id: None,
            books_page_size: book_list::DEFAULT_PAGE_SIZE,
            user_books_page_size: user_books::DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
        }
    }

    pub fn admin_role_id(&self) -> Option<&str> {
        self.admin_role_id.as_deref()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
