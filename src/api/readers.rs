//! Reader borrowing endpoints

use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{book::BookRef, BookSummary},
    AppState,
};

use super::{AppJson, AuthenticatedUser};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub message: String,
    pub borrowed_books: Vec<Uuid>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowedBooksResponse {
    pub borrowed_books: Vec<BookSummary>,
}

/// Borrow a book
#[utoipa::path(
    post,
    path = "/readers/books/borrow",
    tag = "readers",
    security(("bearer_auth" = [])),
    request_body = BookRef,
    responses(
        (status = 200, description = "Book borrowed", body = LoanResponse),
        (status = 400, description = "Out of stock or borrowing limit exceeded", body = ErrorResponse),
        (status = 404, description = "Book or reader not found", body = ErrorResponse)
    )
)]
pub async fn borrow_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    AppJson(request): AppJson<BookRef>,
) -> AppResult<Json<LoanResponse>> {
    let outcome = state.services.loans.borrow(identity.id, request.book_id).await?;

    Ok(Json(LoanResponse {
        message: format!("Book borrowed successfully from {}", outcome.book.author),
        borrowed_books: outcome.borrowed_books,
    }))
}

/// Return a borrowed book
#[utoipa::path(
    post,
    path = "/readers/books/return",
    tag = "readers",
    security(("bearer_auth" = [])),
    request_body = BookRef,
    responses(
        (status = 200, description = "Book returned", body = LoanResponse),
        (status = 400, description = "Book not in the borrowed list", body = ErrorResponse),
        (status = 404, description = "Book or reader not found", body = ErrorResponse)
    )
)]
pub async fn return_book(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
    AppJson(request): AppJson<BookRef>,
) -> AppResult<Json<LoanResponse>> {
    let outcome = state.services.loans.return_book(identity.id, request.book_id).await?;

    Ok(Json(LoanResponse {
        message: format!("Book returned successfully to {}", outcome.book.author),
        borrowed_books: outcome.borrowed_books,
    }))
}

/// List the caller's borrowed books
#[utoipa::path(
    get,
    path = "/readers/books",
    tag = "readers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Borrowed books", body = BorrowedBooksResponse),
        (status = 404, description = "Reader not found", body = ErrorResponse)
    )
)]
pub async fn borrowed_books(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> AppResult<Json<BorrowedBooksResponse>> {
    let borrowed_books = state.services.loans.borrowed_books(identity.id).await?;
    Ok(Json(BorrowedBooksResponse { borrowed_books }))
}
