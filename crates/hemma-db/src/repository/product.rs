//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! ## Key Operations
//! - Bulk seed inserts
//! - Full catalog and favorites listing (ordered by id)
//! - Whole-record update (used to flip the favorite flag)
//! - Lookup by id

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hemma_core::{NewProduct, Product, ProductId};

const PRODUCT_COLUMNS: &str = "id, name, price_cents, category, image_ref, is_favorite";

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Inserts a product and returns its assigned id.
    pub async fn insert(&self, product: &NewProduct) -> DbResult<ProductId> {
        debug!(name = %product.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, price_cents, category, image_ref, is_favorite)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(&product.image_ref)
        .bind(product.is_favorite)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Inserts several products in one transaction.
    ///
    /// Either every product is stored or none is.
    pub async fn insert_many(&self, products: &[NewProduct]) -> DbResult<Vec<ProductId>> {
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(products.len());

        for product in products {
            let result = sqlx::query(
                r#"
                INSERT INTO products (name, price_cents, category, image_ref, is_favorite)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(&product.name)
            .bind(product.price_cents)
            .bind(&product.category)
            .bind(&product.image_ref)
            .bind(product.is_favorite)
            .execute(&mut *tx)
            .await?;

            ids.push(result.last_insert_rowid());
        }

        tx.commit().await?;
        debug!(count = ids.len(), "Inserted products");

        Ok(ids)
    }

    /// Lists every product in id order.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Lists favorite products in id order.
    pub async fn list_favorites(&self) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE is_favorite = 1 ORDER BY id");
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by id.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - No product with that id
    pub async fn get_by_id(&self, id: ProductId) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Writes every field of `product` over the row with the same id.
    ///
    /// ## Returns
    /// * `Ok(())` - Row replaced
    /// * `Err(DbError::NotFound)` - No row with that id
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = product.id, is_favorite = product.is_favorite, "Updating product");

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                price_cents = ?3,
                category = ?4,
                image_ref = ?5,
                is_favorite = ?6
            WHERE id = ?1
            "#,
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(product.price_cents)
        .bind(&product.category)
        .bind(&product.image_ref)
        .bind(product.is_favorite)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", product.id));
        }

        Ok(())
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
