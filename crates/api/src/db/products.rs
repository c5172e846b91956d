//! Product repository.
//!
//! Stock adjustments are not exposed here; they happen inside the order
//! transaction in [`super::orders`] so the check-and-decrement is atomic.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use akubata_core::{ProductId, SupplierId};

use super::RepositoryError;
use crate::models::{NewProduct, Product, ProductPatch};

const PRODUCT_COLUMNS: &str =
    "id, product_name, category, description, unit_price, stock_quantity, \
     image_url, supplier_id, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    product_name: String,
    category: Option<String>,
    description: Option<String>,
    unit_price: Decimal,
    stock_quantity: i32,
    image_url: Option<String>,
    supplier_id: Option<SupplierId>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            product_name: row.product_name,
            category: row.category,
            description: row.description,
            unit_price: row.unit_price,
            stock_quantity: row.stock_quantity,
            image_url: row.image_url,
            supplier_id: row.supplier_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// List a supplier's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_supplier(
        &self,
        supplier_id: SupplierId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             WHERE supplier_id = $1 ORDER BY created_at DESC"
        ))
        .bind(supplier_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Insert a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, including
    /// foreign-key failures for an unknown supplier.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products \
             (product_name, category, description, unit_price, stock_quantity, \
              image_url, supplier_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&product.product_name)
        .bind(&product.category)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.stock_quantity)
        .bind(&product.image_url)
        .bind(product.supplier_id)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update to a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products SET \
               product_name = COALESCE($1, product_name), \
               category = COALESCE($2, category), \
               description = COALESCE($3, description), \
               unit_price = COALESCE($4, unit_price), \
               stock_quantity = COALESCE($5, stock_quantity), \
               image_url = COALESCE($6, image_url), \
               supplier_id = COALESCE($7, supplier_id), \
               is_active = COALESCE($8, is_active), \
               updated_at = NOW() \
             WHERE id = $9 \
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&patch.product_name)
        .bind(&patch.category)
        .bind(&patch.description)
        .bind(patch.unit_price)
        .bind(patch.stock_quantity)
        .bind(&patch.image_url)
        .bind(patch.supplier_id)
        .bind(patch.is_active)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a product.
    ///
    /// # Returns
    ///
    /// Returns `true` if the product was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
