//! Supplier repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use akubata_core::SupplierId;

use super::{RepositoryError, conflict_on_unique};
use crate::models::{NewSupplier, Supplier, SupplierPatch};

const SUPPLIER_COLUMNS: &str = "id, company_name, contact_name, contact_email, contact_phone, \
     address, city, state, country, is_active, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct SupplierRow {
    id: SupplierId,
    company_name: String,
    contact_name: Option<String>,
    contact_email: Option<String>,
    contact_phone: Option<String>,
    address: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Self {
            id: row.id,
            company_name: row.company_name,
            contact_name: row.contact_name,
            contact_email: row.contact_email,
            contact_phone: row.contact_phone,
            address: row.address,
            city: row.city,
            state: row.state,
            country: row.country,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for supplier database operations.
pub struct SupplierRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SupplierRepository<'a> {
    /// Create a new supplier repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all suppliers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Supplier>, RepositoryError> {
        let rows = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Supplier::from).collect())
    }

    /// Get a supplier by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: SupplierId) -> Result<Option<Supplier>, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Supplier::from))
    }

    /// Insert a new supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the contact email is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, supplier: &NewSupplier) -> Result<Supplier, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "INSERT INTO suppliers \
             (company_name, contact_name, contact_email, contact_phone, \
              address, city, state, country) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {SUPPLIER_COLUMNS}"
        ))
        .bind(&supplier.company_name)
        .bind(&supplier.contact_name)
        .bind(&supplier.contact_email)
        .bind(&supplier.contact_phone)
        .bind(&supplier.address)
        .bind(&supplier.city)
        .bind(&supplier.state)
        .bind(&supplier.country)
        .fetch_one(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "a supplier with this contact email already exists"))?;

        Ok(row.into())
    }

    /// Apply a partial update to a supplier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the supplier does not exist.
    /// Returns `RepositoryError::Conflict` if the new contact email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: SupplierId,
        patch: &SupplierPatch,
    ) -> Result<Supplier, RepositoryError> {
        let row = sqlx::query_as::<_, SupplierRow>(&format!(
            "UPDATE suppliers SET \
               company_name = COALESCE($1, company_name), \
               contact_name = COALESCE($2, contact_name), \
               contact_email = COALESCE($3, contact_email), \
               contact_phone = COALESCE($4, contact_phone), \
               address = COALESCE($5, address), \
               city = COALESCE($6, city), \
               state = COALESCE($7, state), \
               country = COALESCE($8, country), \
               is_active = COALESCE($9, is_active), \
               updated_at = NOW() \
             WHERE id = $10 \
             RETURNING {SUPPLIER_COLUMNS}"
        ))
        .bind(&patch.company_name)
        .bind(&patch.contact_name)
        .bind(&patch.contact_email)
        .bind(&patch.contact_phone)
        .bind(&patch.address)
        .bind(&patch.city)
        .bind(&patch.state)
        .bind(&patch.country)
        .bind(patch.is_active)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "a supplier with this contact email already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Delete a supplier.
    ///
    /// Products referencing it keep their rows; the foreign key is nulled.
    ///
    /// # Returns
    ///
    /// Returns `true` if the supplier was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: SupplierId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM suppliers WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
