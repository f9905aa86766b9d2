//! Borrowing engine
//!
//! A loan is recorded twice: the book id in the reader's `borrowed_books`
//! and the reader id in the book's `borrowed_by` (which also drives `stock`).
//! Each side is only changed when it does not already reflect the requested
//! state, so retrying after a half-applied operation never moves stock twice.
//!
//! Writes go reader first, then book, with no transaction around them. If the
//! book write fails the reader's change stays in place.

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookSummary},
        user::{Account, MAX_BORROWED_BOOKS},
    },
    repository::Repository,
};

/// Result of a borrow or return
#[derive(Debug, Clone)]
pub struct LoanOutcome {
    pub book: Book,
    /// The reader's borrowed list after the operation
    pub borrowed_books: Vec<Uuid>,
}

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    async fn find_book(&self, book_id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(book_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    async fn find_reader(&self, reader_id: Uuid) -> AppResult<Account> {
        self.repository
            .users
            .find_by_id(reader_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reader not found".to_string()))
    }

    async fn persist(&self, reader: &Account, book: &Book) -> AppResult<()> {
        self.repository.users.save(reader).await?;

        if let Err(e) = self.repository.books.save(book).await {
            tracing::warn!(
                reader_id = %reader.id,
                book_id = %book.id,
                "Reader saved but book write failed, loan relation is out of sync: {}",
                e
            );
            return Err(e);
        }

        Ok(())
    }

    /// Borrow a book (a repeated borrow of a held book changes nothing)
    pub async fn borrow(&self, reader_id: Uuid, book_id: Uuid) -> AppResult<LoanOutcome> {
        let mut book = self.find_book(book_id).await?;
        if book.stock <= 0 {
            return Err(AppError::OutOfStock);
        }

        let mut reader = self.find_reader(reader_id).await?;
        if !reader.has_borrowed(book_id) && reader.distinct_borrowed() >= MAX_BORROWED_BOOKS {
            return Err(AppError::BorrowLimitExceeded);
        }

        reader.add_borrowed(book_id);
        let stock_taken = book.add_borrower(reader_id);

        self.persist(&reader, &book).await?;

        tracing::info!(
            reader_id = %reader_id,
            book_id = %book_id,
            stock = book.stock,
            stock_taken,
            "Book borrowed"
        );

        Ok(LoanOutcome {
            book,
            borrowed_books: reader.borrowed_books,
        })
    }

    /// Return a borrowed book
    pub async fn return_book(&self, reader_id: Uuid, book_id: Uuid) -> AppResult<LoanOutcome> {
        let mut book = self.find_book(book_id).await?;

        let mut reader = self.find_reader(reader_id).await?;
        if !reader.has_borrowed(book_id) {
            return Err(AppError::NotBorrowed);
        }

        reader.remove_borrowed(book_id);
        let stock_released = book.remove_borrower(reader_id);

        self.persist(&reader, &book).await?;

        tracing::info!(
            reader_id = %reader_id,
            book_id = %book_id,
            stock = book.stock,
            stock_released,
            "Book returned"
        );

        Ok(LoanOutcome {
            book,
            borrowed_books: reader.borrowed_books,
        })
    }

    /// The reader's borrowed books, in borrow order. Deleted books are skipped.
    pub async fn borrowed_books(&self, reader_id: Uuid) -> AppResult<Vec<BookSummary>> {
        let reader = self.find_reader(reader_id).await?;
        let books = self.repository.books.find_many(&reader.borrowed_books).await?;

        Ok(reader
            .borrowed_books
            .iter()
            .filter_map(|id| books.iter().find(|book| book.id == *id))
            .map(Book::summary)
            .collect())
    }
}
