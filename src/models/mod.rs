//! Data models for Bookshelf

pub mod book;
pub mod user;

// Re-export commonly used types
pub use book::{Book, BookSummary, BookWithBorrowers, Pagination};
pub use user::{Account, AccountProfile, AccountShort, Identity, Role, UserClaims};
