pub mod auth;
pub mod books;
pub mod donations;
pub mod health;
pub mod pdfs;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::domain::DomainError;
use crate::domain::donation::MAX_PDF_BYTES;
use crate::infrastructure::AppState;

/// Room for an oversized file to reach the form checks instead of being cut off
const DONATION_BODY_LIMIT: usize = MAX_PDF_BYTES * 2;

pub fn api_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Auth
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        // Catalog
        .route("/books", get(books::list_books))
        .route("/books/:id", get(books::get_book))
        // Donations
        .route(
            "/donations",
            post(donations::create_donation).layer(DefaultBodyLimit::max(DONATION_BODY_LIMIT)),
        )
        .route("/list-pdfs", get(pdfs::list_pdfs))
        .with_state(state)
}

/// JSON error body with a status derived from the error kind
pub fn error_response(err: DomainError) -> Response {
    let status = match &err {
        DomainError::NotFound => StatusCode::NOT_FOUND,
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::AuthenticationRequired | DomainError::InvalidCredentials => {
            StatusCode::UNAUTHORIZED
        }
        DomainError::Database(_)
        | DomainError::Storage(_)
        | DomainError::External(_)
        | DomainError::Internal(_) => {
            tracing::error!("Request failed: {}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}
