use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use super::error_response;
use crate::domain::{Availability, BookFilter};
use crate::infrastructure::AppState;

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Genre id
    pub genre: Option<String>,
    /// Substring of title or description
    pub q: Option<String>,
    /// `in-stock` or `out-of-stock`
    pub availability: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/books",
    params(BookQuery),
    responses(
        (status = 200, description = "Catalog books matching the filter"),
        (status = 400, description = "Unknown availability value")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(params): Query<BookQuery>,
) -> impl IntoResponse {
    let availability = match params.availability.as_deref() {
        None | Some("") => None,
        Some("in-stock") => Some(Availability::InStock),
        Some("out-of-stock") => Some(Availability::OutOfStock),
        Some(other) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": format!("Unknown availability '{}'", other) })),
            )
                .into_response();
        }
    };
    let filter = BookFilter {
        genre: params.genre.filter(|g| !g.trim().is_empty()),
        query: params.q.filter(|q| !q.trim().is_empty()),
        availability,
    };

    match state.book_repo.find_all(filter).await {
        Ok(books) => (
            StatusCode::OK,
            Json(json!({
                "total": books.len(),
                "books": books,
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

#[utoipa::path(
    get,
    path = "/api/books/{id}",
    params(("id" = String, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book"),
        (status = 404, description = "No such book")
    )
)]
pub async fn get_book(State(state): State<AppState>, Path(id): Path<String>) -> impl IntoResponse {
    match state.book_repo.find_by_id(&id).await {
        Ok(Some(book)) => (StatusCode::OK, Json(json!(book))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Book not found" })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}
