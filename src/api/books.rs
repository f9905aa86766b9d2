//! Public catalog endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        book::{BookQuery, SearchQuery},
        Book, Pagination,
    },
    AppState,
};

/// One page of catalog results
#[derive(Serialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<Book>,
    pub pagination: Pagination,
}

/// List all books, newest first
#[utoipa::path(
    get,
    path = "/public/books",
    tag = "catalog",
    params(BookQuery),
    responses(
        (status = 200, description = "Page of books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookPage>> {
    let (books, pagination) = state.services.catalog.list_books(&query).await?;
    Ok(Json(BookPage { books, pagination }))
}

/// Search books by title or genre
#[utoipa::path(
    get,
    path = "/public/books/search",
    tag = "catalog",
    params(SearchQuery),
    responses(
        (status = 200, description = "Page of matching books", body = BookPage),
        (status = 400, description = "Search query is required", body = ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<BookPage>> {
    let (books, pagination) = state.services.catalog.search_books(&query).await?;
    Ok(Json(BookPage { books, pagination }))
}
