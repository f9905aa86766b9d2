//! Catalog management service

use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::book::{
        Book, BookQuery, BookWithBorrowers, CreateBook, PageRequest, Pagination, SearchQuery,
        UpdateBook,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Create a book owned by the author and record it in the author's written list
    pub async fn create_book(&self, author_id: Uuid, request: CreateBook) -> AppResult<Book> {
        request.validate()?;

        let mut author = self
            .repository
            .users
            .find_by_id(author_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Author not found".to_string()))?;

        let book = Book::new(author_id, request);
        self.repository.books.insert(&book).await?;

        author.books_written.push(book.id);
        author.updated_at = book.created_at;
        self.repository.users.save(&author).await?;

        tracing::info!(book_id = %book.id, author_id = %author_id, "Book created");
        Ok(book)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    pub async fn books_by_author(&self, author_id: Uuid) -> AppResult<Vec<Book>> {
        self.repository.books.find_by_author(author_id).await
    }

    /// The author's books with each borrower resolved to name and email.
    /// Borrowers whose account is gone are left out.
    pub async fn books_with_borrowers(&self, author_id: Uuid) -> AppResult<Vec<BookWithBorrowers>> {
        let books = self.books_by_author(author_id).await?;

        let mut borrower_ids: Vec<Uuid> = books
            .iter()
            .flat_map(|book| book.borrowed_by.iter().copied())
            .collect();
        borrower_ids.sort_unstable();
        borrower_ids.dedup();

        let borrowers: HashMap<Uuid, _> = self
            .repository
            .users
            .find_many(&borrower_ids)
            .await?
            .into_iter()
            .map(|account| (account.id, account.short()))
            .collect();

        Ok(books
            .into_iter()
            .map(|book| {
                let resolved = book
                    .borrowed_by
                    .iter()
                    .filter_map(|id| borrowers.get(id).cloned())
                    .collect();
                book.with_borrowers(resolved)
            })
            .collect())
    }

    /// Fetch a book only if the requester owns it
    async fn owned_book(&self, author_id: Uuid, book_id: Uuid) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(book_id)
            .await?
            .filter(|book| book.is_owned_by(author_id))
            .ok_or_else(|| AppError::NotFound("Book not found or not owned by you".to_string()))
    }

    /// Patch title, genre or stock. Returns the book before and after.
    pub async fn update_book(&self, author_id: Uuid, update: UpdateBook) -> AppResult<(Book, Book)> {
        update.validate()?;

        let mut book = self.owned_book(author_id, update.book_id).await?;
        let old_book = book.clone();

        update.apply(&mut book);
        self.repository.books.save(&book).await?;

        Ok((old_book, book))
    }

    /// Delete an owned book and drop it from the author's written list.
    /// Readers still holding it keep the id in their borrowed list.
    pub async fn delete_book(&self, author_id: Uuid, book_id: Uuid) -> AppResult<Book> {
        let book = self.owned_book(author_id, book_id).await?;
        self.repository.books.delete(book.id).await?;

        if let Some(mut author) = self.repository.users.find_by_id(author_id).await? {
            author.books_written.retain(|id| *id != book.id);
            author.updated_at = chrono::Utc::now();
            self.repository.users.save(&author).await?;
        }

        tracing::info!(book_id = %book.id, author_id = %author_id, "Book deleted");
        Ok(book)
    }

    /// Public paginated listing
    pub async fn list_books(&self, query: &BookQuery) -> AppResult<(Vec<Book>, Pagination)> {
        let page = PageRequest::new(query.page, query.limit);
        let (books, total) = self.repository.books.list(page.offset(), page.limit).await?;
        Ok((books, page.pagination(total)))
    }

    /// Public search over title or genre
    pub async fn search_books(&self, query: &SearchQuery) -> AppResult<(Vec<Book>, Pagination)> {
        let needle = query
            .query
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty())
            .ok_or_else(|| AppError::Validation("Search query is required".to_string()))?;

        let page = PageRequest::new(query.page, query.limit);
        let (books, total) = self
            .repository
            .books
            .search(needle, page.offset(), page.limit)
            .await?;
        Ok((books, page.pagination(total)))
    }
}
