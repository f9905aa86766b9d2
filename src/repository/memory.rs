//! In-process stores, used for development (`database.url = "memory:"`) and tests

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::{Account, Book},
};

use super::{AccountStore, BookStore};

#[derive(Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: &Account) -> AppResult<()> {
        let mut accounts = self.accounts.write().await;
        if accounts
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&account.email))
        {
            return Err(AppError::AlreadyExists("User already exists".to_string()));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .await
            .values()
            .find(|account| account.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Account>> {
        let accounts = self.accounts.read().await;
        Ok(ids.iter().filter_map(|id| accounts.get(id).cloned()).collect())
    }

    async fn save(&self, account: &Account) -> AppResult<()> {
        match self.accounts.write().await.get_mut(&account.id) {
            Some(stored) => {
                *stored = account.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("User with id {} not found", account.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        Ok(self.accounts.write().await.remove(&id).map_or(0, |_| 1))
    }
}

#[derive(Default)]
pub struct MemoryBookStore {
    books: RwLock<HashMap<Uuid, Book>>,
}

impl MemoryBookStore {
    async fn page_where<F>(&self, offset: i64, limit: i64, keep: F) -> (Vec<Book>, i64)
    where
        F: Fn(&Book) -> bool,
    {
        let books = self.books.read().await;
        let mut matching: Vec<&Book> = books.values().filter(|book| keep(*book)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));

        let total = matching.len() as i64;
        let page = matching
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        (page, total)
    }
}

#[async_trait]
impl BookStore for MemoryBookStore {
    async fn insert(&self, book: &Book) -> AppResult<()> {
        self.books.write().await.insert(book.id, book.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn find_by_author(&self, author: Uuid) -> AppResult<Vec<Book>> {
        let mut books: Vec<Book> = self
            .books
            .read()
            .await
            .values()
            .filter(|book| book.author == author)
            .cloned()
            .collect();
        books.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(books)
    }

    async fn find_many(&self, ids: &[Uuid]) -> AppResult<Vec<Book>> {
        let books = self.books.read().await;
        Ok(ids.iter().filter_map(|id| books.get(id).cloned()).collect())
    }

    async fn save(&self, book: &Book) -> AppResult<()> {
        match self.books.write().await.get_mut(&book.id) {
            Some(stored) => {
                *stored = book.clone();
                Ok(())
            }
            None => Err(AppError::NotFound(format!("Book with id {} not found", book.id))),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<u64> {
        Ok(self.books.write().await.remove(&id).map_or(0, |_| 1))
    }

    async fn list(&self, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)> {
        Ok(self.page_where(offset, limit, |_| true).await)
    }

    async fn search(&self, needle: &str, offset: i64, limit: i64) -> AppResult<(Vec<Book>, i64)> {
        let needle = needle.to_lowercase();
        Ok(self
            .page_where(offset, limit, |book| {
                book.title.to_lowercase().contains(&needle)
                    || book.genre.to_lowercase().contains(&needle)
            })
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{book::CreateBook, Role};

    fn book(title: &str, genre: &str) -> Book {
        Book::new(
            Uuid::new_v4(),
            CreateBook {
                title: title.to_string(),
                genre: genre.to_string(),
                stock: 1,
            },
        )
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryAccountStore::default();
        let first = Account::new("A".into(), "a@example.com".into(), "h".into(), Role::Reader);
        let second = Account::new("B".into(), "A@example.com".into(), "h".into(), Role::Author);

        store.insert(&first).await.unwrap();
        let err = store.insert(&second).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_save_missing_account_fails() {
        let store = MemoryAccountStore::default();
        let account = Account::new("A".into(), "a@example.com".into(), "h".into(), Role::Reader);
        assert!(matches!(store.save(&account).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_search_matches_title_or_genre() {
        let store = MemoryBookStore::default();
        store.insert(&book("Dune", "Science Fiction")).await.unwrap();
        store.insert(&book("Emma", "Romance")).await.unwrap();
        store.insert(&book("Neuromancer", "Cyberpunk")).await.unwrap();

        let (found, total) = store.search("ROMANCE", 0, 10).await.unwrap();
        assert_eq!(total, 2);
        assert_eq!(found.len(), 2);

        let (found, total) = store.search("fiction", 0, 10).await.unwrap();
        assert_eq!(total, 1);
        assert_eq!(found[0].title, "Dune");

        let (found, total) = store.search("zzz", 0, 10).await.unwrap();
        assert!(found.is_empty());
        assert_eq!(total, 0);
    }

    #[tokio::test]
    async fn test_list_pages() {
        let store = MemoryBookStore::default();
        for i in 0..5 {
            store.insert(&book(&format!("Book {}", i), "Essay")).await.unwrap();
        }

        let (page, total) = store.list(4, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page.len(), 1);
    }
}
