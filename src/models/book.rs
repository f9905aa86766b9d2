//! Book model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::user::AccountShort;

const DEFAULT_PAGE_SIZE: i64 = 10;
const MAX_PAGE_SIZE: i64 = 100;

/// Upper bound for a book's stock, matching the validators on create and update
pub const MAX_STOCK: i32 = 1_000_000;

/// Stored book document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    /// Owning author's account id
    pub author: Uuid,
    pub genre: String,
    pub stock: i32,
    pub borrowed_by: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn new(author: Uuid, book: CreateBook) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: book.title,
            author,
            genre: book.genre,
            stock: book.stock,
            borrowed_by: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, account_id: Uuid) -> bool {
        self.author == account_id
    }

    pub fn is_borrowed_by(&self, reader_id: Uuid) -> bool {
        self.borrowed_by.contains(&reader_id)
    }

    /// Records the reader and takes one copy out of stock, only the first time.
    pub fn add_borrower(&mut self, reader_id: Uuid) -> bool {
        if self.is_borrowed_by(reader_id) {
            return false;
        }
        self.borrowed_by.push(reader_id);
        self.stock = self.stock.saturating_sub(1);
        self.updated_at = Utc::now();
        true
    }

    /// Releases the reader's copy back to stock if the reader was recorded.
    pub fn remove_borrower(&mut self, reader_id: Uuid) -> bool {
        if !self.is_borrowed_by(reader_id) {
            return false;
        }
        self.borrowed_by.retain(|id| *id != reader_id);
        self.stock = self.stock.saturating_add(1);
        self.updated_at = Utc::now();
        true
    }

    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            author: self.author,
            genre: self.genre.clone(),
        }
    }

    pub fn with_borrowers(self, borrowers: Vec<AccountShort>) -> BookWithBorrowers {
        BookWithBorrowers {
            id: self.id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            stock: self.stock,
            borrowed_by: borrowers,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Book as listed for its author, borrowers resolved
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookWithBorrowers {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub genre: String,
    pub stock: i32,
    pub borrowed_by: Vec<AccountShort>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Book as listed for a reader
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub author: Uuid,
    pub genre: String,
}

/// Create book request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Genre is required"))]
    pub genre: String,
    #[validate(range(min = 0, max = 1_000_000, message = "Stock must be between 0 and 1000000"))]
    pub stock: i32,
}

/// Partial book update; stock is overwritten, not adjusted
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    pub book_id: Uuid,
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Genre cannot be empty"))]
    pub genre: Option<String>,
    #[validate(range(min = 0, max = 1_000_000, message = "Stock must be between 0 and 1000000"))]
    pub stock: Option<i32>,
}

impl UpdateBook {
    pub fn apply(self, book: &mut Book) {
        if let Some(title) = self.title {
            book.title = title;
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(stock) = self.stock {
            book.stock = stock;
        }
        book.updated_at = Utc::now();
    }
}

/// Request body naming a single book
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookRef {
    pub book_id: Uuid,
}

/// Catalog listing query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Catalog search query
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Substring matched against title or genre, case-insensitive
    pub query: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Normalized offset/limit window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Saturates for out-of-range pages, which then come back empty
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn pagination(&self, total_books: i64) -> Pagination {
        Pagination {
            total_books,
            total_pages: (total_books + self.limit - 1) / self.limit,
            current_page: self.page,
            limit: self.limit,
        }
    }
}

/// Page metadata returned with catalog listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub total_books: i64,
    pub total_pages: i64,
    pub current_page: i64,
    pub limit: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(stock: i32) -> Book {
        Book::new(
            Uuid::new_v4(),
            CreateBook {
                title: "Dune".to_string(),
                genre: "Science Fiction".to_string(),
                stock,
            },
        )
    }

    #[test]
    fn test_add_borrower_moves_stock_once() {
        let mut book = book(2);
        let reader = Uuid::new_v4();
        assert!(book.add_borrower(reader));
        assert!(!book.add_borrower(reader));
        assert_eq!(book.stock, 1);
        assert_eq!(book.borrowed_by, vec![reader]);
    }

    #[test]
    fn test_remove_borrower_only_if_present() {
        let mut book = book(1);
        let reader = Uuid::new_v4();
        assert!(!book.remove_borrower(reader));
        assert_eq!(book.stock, 1);

        book.add_borrower(reader);
        assert_eq!(book.stock, 0);
        assert!(book.remove_borrower(reader));
        assert_eq!(book.stock, 1);
        assert!(book.borrowed_by.is_empty());
    }

    #[test]
    fn test_update_overwrites_stock() {
        let mut book = book(3);
        UpdateBook {
            book_id: book.id,
            title: None,
            genre: Some("Classic".to_string()),
            stock: Some(0),
        }
        .apply(&mut book);
        assert_eq!(book.stock, 0);
        assert_eq!(book.genre, "Classic");
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn test_page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, 100);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_huge_page_saturates_offset() {
        let page = PageRequest::new(Some(i64::MAX), Some(100));
        assert_eq!(page.offset(), i64::MAX);
        let pagination = page.pagination(3);
        assert_eq!(pagination.current_page, i64::MAX);
        assert_eq!(pagination.total_pages, 1);
    }

    #[test]
    fn test_stock_bounds() {
        let create = |stock| CreateBook {
            title: "Dune".to_string(),
            genre: "Science Fiction".to_string(),
            stock,
        };
        assert!(create(MAX_STOCK).validate().is_ok());
        assert!(create(MAX_STOCK + 1).validate().is_err());
        assert!(create(-1).validate().is_err());

        let update = UpdateBook {
            book_id: Uuid::new_v4(),
            title: None,
            genre: None,
            stock: Some(i32::MAX),
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_return_at_max_stock_does_not_overflow() {
        let mut book = book(1);
        let reader = Uuid::new_v4();
        book.add_borrower(reader);
        book.stock = i32::MAX;
        assert!(book.remove_borrower(reader));
        assert_eq!(book.stock, i32::MAX);
    }

    #[test]
    fn test_pagination_pages() {
        let page = PageRequest::new(Some(1), Some(10));
        assert_eq!(page.pagination(0).total_pages, 0);
        assert_eq!(page.pagination(10).total_pages, 1);
        assert_eq!(page.pagination(11).total_pages, 2);
    }

    #[test]
    fn test_book_json_is_camel_case() {
        let json = serde_json::to_value(book(1)).unwrap();
        assert!(json["borrowedBy"].is_array());
        assert_eq!(json["stock"], 1);
    }
}
