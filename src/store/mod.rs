//! Store abstraction. Handlers receive these as injected trait objects so
//! tests can substitute an in-memory fake for the SQLite-backed store.

pub mod sqlite;

use async_trait::async_trait;

use crate::models::product::{Product, ProductDraft};
use crate::models::user::User;

pub use sqlite::SqliteStore;

#[derive(Debug)]
pub enum StoreError {
    Database(sqlx::Error),
    /// A persisted value failed to round-trip (e.g. an unparseable price).
    Corrupt(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(inner: sqlx::Error) -> Self {
        StoreError::Database(inner)
    }
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Database(e) => write!(f, "database error: {e}"),
            StoreError::Corrupt(msg) => write!(f, "corrupt row: {msg}"),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Persists a new user with the default role.
    async fn insert(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Every product, newest first.
    async fn all(&self) -> Result<Vec<Product>, StoreError>;

    /// One page of products whose name contains `term` case-insensitively
    /// (no term matches everything), together with the filtered total.
    async fn search(
        &self,
        term: Option<&str>,
        skip: i64,
        take: i64,
    ) -> Result<(Vec<Product>, i64), StoreError>;

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError>;

    async fn insert(&self, draft: &ProductDraft) -> Result<Product, StoreError>;

    /// Overwrites name/price/stock, leaving the creation timestamp alone.
    /// Returns `None` when the row vanished between check and write.
    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Option<Product>, StoreError>;

    /// Returns whether a row was actually removed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
