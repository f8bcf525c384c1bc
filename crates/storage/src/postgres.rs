//! PostgreSQL-backed stores.
//!
//! Products and orders are stored as JSONB documents, mirroring the
//! schemaless document store this client was written against. The stock
//! update rewrites a single field inside the document; there is no
//! compare-and-swap, so concurrent writers resolve to last-write-wins.

use async_trait::async_trait;
use common::{OrderId, ProductId, UserId};
use domain::{Order, Product};
use sqlx::{PgPool, Row};

use crate::error::{Result, StorageError};
use crate::store::{OrderLog, ProductStore};

/// Product store backed by a `products` table of JSONB documents.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Creates a store over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn get_all(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query("SELECT doc FROM products ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let doc: serde_json::Value = row.try_get("doc")?;
                Ok(serde_json::from_value(doc)?)
            })
            .collect()
    }

    async fn get_by_id(&self, id: &ProductId) -> Result<Option<Product>> {
        let row = sqlx::query("SELECT doc FROM products WHERE id = $1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let doc: serde_json::Value = row.try_get("doc")?;
                Ok(Some(serde_json::from_value(doc)?))
            }
            None => Ok(None),
        }
    }

    async fn update_stock(&self, id: &ProductId, new_stock: u32) -> Result<()> {
        let result = sqlx::query(
            "UPDATE products SET doc = jsonb_set(doc, '{stock}', to_jsonb($2::BIGINT)) WHERE id = $1",
        )
        .bind(id.as_str())
        .bind(i64::from(new_stock))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::ProductNotFound(id.clone()));
        }
        Ok(())
    }

    async fn insert(&self, product: Product) -> Result<()> {
        let doc = serde_json::to_value(&product)?;

        sqlx::query(
            r#"
            INSERT INTO products (id, doc)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE SET doc = EXCLUDED.doc
            "#,
        )
        .bind(product.id.as_str())
        .bind(doc)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM products")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// Order log backed by an `orders` table.
///
/// The uid is a separate indexed column; the rest of the record is a JSONB
/// document.
#[derive(Clone)]
pub struct PostgresOrderLog {
    pool: PgPool,
}

impl PostgresOrderLog {
    /// Creates a log over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: sqlx::postgres::PgRow) -> Result<Order> {
        let doc: serde_json::Value = row.try_get("doc")?;
        Ok(serde_json::from_value(doc)?)
    }
}

#[async_trait]
impl OrderLog for PostgresOrderLog {
    async fn append(&self, user_id: &UserId, order: &Order) -> Result<()> {
        let doc = serde_json::to_value(order)?;

        sqlx::query(
            r#"
            INSERT INTO orders (id, user_id, order_number, doc, created_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(order.id.as_uuid())
        .bind(user_id.as_str())
        .bind(order.order_number.as_str())
        .bind(doc)
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            "SELECT doc FROM orders WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn get(&self, id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query("SELECT doc FROM orders WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(Self::row_to_order).transpose()
    }
}
