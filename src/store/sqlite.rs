use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePool;

use super::{ProductStore, StoreError, UserStore};
use crate::models::product::{Product, ProductDraft};
use crate::models::user::{User, DEFAULT_ROLE};

/// SQLite-backed implementation of both stores, sharing one pool.
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Raw product row; price lives in the column as a decimal string.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    price: String,
    stock: i64,
    created_at: chrono::NaiveDateTime,
}

impl TryFrom<ProductRow> for Product {
    type Error = StoreError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Decimal::from_str(&row.price).map_err(|e| {
            StoreError::Corrupt(format!("product {} has invalid price: {e}", row.id))
        })?;
        Ok(Product {
            id: row.id,
            name: row.name,
            price,
            stock: row.stock,
            created_at: row.created_at,
        })
    }
}

fn collect(rows: Vec<ProductRow>) -> Result<Vec<Product>, StoreError> {
    rows.into_iter().map(Product::try_from).collect()
}

/// Escapes LIKE wildcards so the search term always matches literally.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

const PRODUCT_COLUMNS: &str = "id, name, price, stock, created_at";

#[async_trait]
impl UserStore for SqliteStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password_hash, role, created_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password_hash, role) VALUES (?, ?, ?, ?) \
             RETURNING id, email, name, password_hash, role, created_at",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(DEFAULT_ROLE)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }
}

#[async_trait]
impl ProductStore for SqliteStore {
    async fn all(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;
        collect(rows)
    }

    async fn search(
        &self,
        term: Option<&str>,
        skip: i64,
        take: i64,
    ) -> Result<(Vec<Product>, i64), StoreError> {
        // Genuine case-insensitive containment at the query layer, rather
        // than backend-specific case-insensitive operators.
        let (rows, total) = match term {
            Some(term) => {
                let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
                let rows = sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     WHERE lower(name) LIKE ? ESCAPE '\\' \
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
                ))
                .bind(&pattern)
                .bind(take)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?;
                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM products WHERE lower(name) LIKE ? ESCAPE '\\'",
                )
                .bind(&pattern)
                .fetch_one(&self.pool)
                .await?;
                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, ProductRow>(&format!(
                    "SELECT {PRODUCT_COLUMNS} FROM products \
                     ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
                ))
                .bind(take)
                .bind(skip)
                .fetch_all(&self.pool)
                .await?;
                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
                    .fetch_one(&self.pool)
                    .await?;
                (rows, total)
            }
        };
        Ok((collect(rows)?, total))
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Product::try_from).transpose()
    }

    async fn insert(&self, draft: &ProductDraft) -> Result<Product, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (name, price, stock) VALUES (?, ?, ?) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(draft.price.to_string())
        .bind(draft.stock)
        .fetch_one(&self.pool)
        .await?;
        Product::try_from(row)
    }

    async fn update(&self, id: i64, draft: &ProductDraft) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET name = ?, price = ?, stock = ? WHERE id = ? \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(draft.price.to_string())
        .bind(draft.stock)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Product::try_from).transpose()
    }

    async fn delete(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
