//! Author book management endpoints
//!
//! Every route here sits behind the auth gate and the author role gate.
//! A book owned by another author is reported as not found.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{
        book::{BookRef, CreateBook, UpdateBook},
        Book, BookWithBorrowers,
    },
    AppState,
};

use super::{AppJson, AuthenticatedUser};

#[derive(Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    pub book: Book,
}

#[derive(Serialize, ToSchema)]
pub struct AuthorBooksResponse {
    pub books: Vec<BookWithBorrowers>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookResponse {
    pub message: String,
    pub old_book: Book,
    pub book: Book,
}

/// Publish a new book
#[utoipa::path(
    post,
    path = "/authors/books/create",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = CreateBook,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 403, description = "Not an author", body = ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    AppJson(request): AppJson<CreateBook>,
) -> AppResult<(StatusCode, Json<BookResponse>)> {
    let book = state.services.catalog.create_book(identity.id, request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookResponse {
            message: "Book created successfully".to_string(),
            book,
        }),
    ))
}

/// List the caller's books with their current borrowers
#[utoipa::path(
    get,
    path = "/authors/books",
    tag = "authors",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Books written by the caller", body = AuthorBooksResponse),
        (status = 403, description = "Not an author", body = ErrorResponse)
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<AuthorBooksResponse>> {
    let books = state.services.catalog.books_with_borrowers(identity.id).await?;
    Ok(Json(AuthorBooksResponse { books }))
}

/// Update one of the caller's books
#[utoipa::path(
    put,
    path = "/authors/books/update",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = UpdateBook,
    responses(
        (status = 200, description = "Book updated", body = UpdateBookResponse),
        (status = 404, description = "Book not found or not owned", body = ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    AppJson(update): AppJson<UpdateBook>,
) -> AppResult<Json<UpdateBookResponse>> {
    let (old_book, book) = state.services.catalog.update_book(identity.id, update).await?;

    Ok(Json(UpdateBookResponse {
        message: "Book updated successfully".to_string(),
        old_book,
        book,
    }))
}

/// Delete one of the caller's books
#[utoipa::path(
    delete,
    path = "/authors/books/delete",
    tag = "authors",
    security(("bearer_auth" = [])),
    request_body = BookRef,
    responses(
        (status = 200, description = "Book deleted", body = BookResponse),
        (status = 404, description = "Book not found or not owned", body = ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    AppJson(request): AppJson<BookRef>,
) -> AppResult<Json<BookResponse>> {
    let book = state.services.catalog.delete_book(identity.id, request.book_id).await?;

    Ok(Json(BookResponse {
        message: "Book deleted successfully".to_string(),
        book,
    }))
}
