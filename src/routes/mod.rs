//! Route definitions for the Bookshelf API.

pub mod admin;
pub mod auth;
pub mod books;
pub mod comments;
pub mod health;
pub mod users;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};

use crate::AppState;

const MAX_BODY_BYTES: usize = 1024 * 1024;

fn cors_layer(frontend_url: &str) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);
    match frontend_url.parse::<HeaderValue>() {
        Ok(origin) => cors.allow_origin(origin),
        Err(e) => {
            tracing::warn!(frontend_url, error = %e, "Invalid FRONTEND_URL, allowing any origin");
            cors.allow_origin(Any)
        }
    }
}

/// Versioned API routes.
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/books", get(books::list).post(books::create))
        .route(
            "/books/{id}",
            get(books::get_by_id)
                .patch(books::update)
                .delete(books::delete),
        )
        .route(
            "/books/{id}/comments",
            get(comments::list).post(comments::create),
        )
        .route(
            "/books/{id}/comments/{comment_id}",
            delete(comments::delete),
        )
        .route("/genres", get(books::genres))
        .route("/users/{id}/books", get(users::books))
        .route("/me", get(users::me))
        .route("/admin/stats", get(admin::stats))
}

/// Full application router with shared middleware.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);
    Router::new()
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
                .layer(cors)
                .layer(CompressionLayer::new()),
        )
        .with_state(state)
}
