//! Repository layer: document-style stores for accounts and books
//!
//! Every write is a whole-document save (last write wins). Nothing here
//! spans two documents; callers coordinating accounts and books do so
//! without a transaction.

pub mod books;
pub mod memory;
pub mod users;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Account, Book},
};

/// Account storage, addressed by id or email
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `AlreadyExists` if the email is taken
    async fn insert(&self, account: &Account) -> AppResult<()>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>>;
    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>>;
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Account>>;
    /// Fails with `NotFound` if the account no longer exists
    async fn save(&self, account: &Account) -> AppResult<()>;
    /// Returns the number of removed documents
    async fn delete(&self, id: Uuid) -> AppResult<u64>;
}

/// Book storage, addressed by id or author, plus paged listing and search
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn insert(&self, book: &Book) -> AppResult<()>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>>;
    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>>;
    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>>;
    /// Fails with `NotFound` if the book no longer exists
    async fn save(&self, book: &Book) -> AppResult<()>;
    async fn delete(&self, id: Uuid) -> AppResult<u64>;
    /// Newest first, with the total count
    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)>;
    /// Case-insensitive substring match on title or genre, newest first
    async fn search(&self, needle: &str, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)>;
}

/// Main repository struct holding both stores
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn AccountStore>,
    pub books: Arc<dyn BookStore>,
    pool: Option<Pool<Postgres>>,
}

impl Repository {
    pub fn new(users: Arc<dyn AccountStore>, books: Arc<dyn BookStore>) -> Self {
        Self {
            users,
            books,
            pool: None,
        }
    }

    /// Repository backed by PostgreSQL
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::UsersRepository::new(pool.clone())),
            books: Arc::new(books::BooksRepository::new(pool.clone())),
            pool: Some(pool),
        }
    }

    /// Repository kept in process memory
    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(memory::MemoryAccountStore::default()),
            books: Arc::new(memory::MemoryBookStore::default()),
            pool: None,
        }
    }

    /// Name of the backing store, as reported by the readiness check
    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Round trip to the database; in-process stores are always reachable
    pub async fn ping(&self) -> AppResult<()> {
        if let Some(pool) = &self.pool {
            sqlx::query("SELECT 1").execute(pool).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_is_always_ready() {
        let repository = Repository::in_memory();
        assert_eq!(repository.backend(), "memory");
        assert!(repository.ping().await.is_ok());
    }
}
