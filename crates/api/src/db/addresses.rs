//! Address repository.
//!
//! Maintains the single-default-per-user invariant: for any user, at most one
//! address row has `is_default = true` in any committed state. Every mutation
//! that can set the flag runs clear-then-set inside one transaction, locking
//! the owner's address rows with `FOR UPDATE` so concurrent mutations for the
//! same user serialize. A partial unique index on `(user_id) WHERE is_default`
//! backs the invariant at the schema level.

use sqlx::{PgPool, Postgres, Transaction};

use akubata_core::{AddressId, UserId};

use super::{RepositoryError, conflict_on_unique, violated_constraint};
use crate::models::address::{Address, AddressPatch, NewAddress};

const ADDRESS_COLUMNS: &str = "id, user_id, label, recipient_first_name, recipient_last_name, \
     phone_number, address_line1, address_line2, city, state, zip_code, country, \
     is_default, created_at, updated_at";

/// Database row for an address.
#[derive(sqlx::FromRow)]
struct AddressRow {
    id: AddressId,
    user_id: UserId,
    label: Option<String>,
    recipient_first_name: String,
    recipient_last_name: Option<String>,
    phone_number: String,
    address_line1: String,
    address_line2: Option<String>,
    city: String,
    state: String,
    zip_code: String,
    country: String,
    is_default: bool,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AddressRow> for Address {
    fn from(row: AddressRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            label: row.label,
            recipient_first_name: row.recipient_first_name,
            recipient_last_name: row.recipient_last_name,
            phone_number: row.phone_number,
            address_line1: row.address_line1,
            address_line2: row.address_line2,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            country: row.country,
            is_default: row.is_default,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for address database operations.
pub struct AddressRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AddressRepository<'a> {
    /// Create a new address repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Lock every address row the owner has, in a stable order.
    ///
    /// Default-flag mutations for the same owner serialize on these locks,
    /// so clear-then-set stays atomic against concurrent transactions.
    async fn lock_owner_rows(
        tx: &mut Transaction<'_, Postgres>,
        owner: UserId,
    ) -> Result<Vec<AddressId>, RepositoryError> {
        let rows: Vec<(AddressId,)> =
            sqlx::query_as("SELECT id FROM addresses WHERE user_id = $1 ORDER BY id FOR UPDATE")
                .bind(owner)
                .fetch_all(&mut **tx)
                .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// List all addresses owned by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Address>, RepositoryError> {
        let rows = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 ORDER BY created_at ASC"
        ))
        .bind(owner)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Address::from).collect())
    }

    /// Get an address by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        owner: UserId,
        id: AddressId,
    ) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Get the owner's default address, if one is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_default(&self, owner: UserId) -> Result<Option<Address>, RepositoryError> {
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses WHERE user_id = $1 AND is_default"
        ))
        .bind(owner)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Address::from))
    }

    /// Insert a new address for a user.
    ///
    /// Runs in one transaction: rejects an address identical in
    /// line1/city/state/zip/country to an existing one for the same owner,
    /// and clears any existing default first when the candidate is default.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` for a duplicate address.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        owner: UserId,
        address: &NewAddress,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let duplicate: Option<(AddressId,)> = sqlx::query_as(
            "SELECT id FROM addresses \
             WHERE user_id = $1 AND address_line1 = $2 AND city = $3 \
               AND state = $4 AND zip_code = $5 AND country = $6",
        )
        .bind(owner)
        .bind(&address.address_line1)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .fetch_optional(&mut *tx)
        .await?;

        if duplicate.is_some() {
            return Err(RepositoryError::Conflict(
                "an identical address already exists".to_owned(),
            ));
        }

        if address.is_default {
            Self::lock_owner_rows(&mut tx, owner).await?;

            sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
                .bind(owner)
                .execute(&mut *tx)
                .await?;
        }

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "INSERT INTO addresses \
             (user_id, label, recipient_first_name, recipient_last_name, phone_number, \
              address_line1, address_line2, city, state, zip_code, country, is_default) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(owner)
        .bind(&address.label)
        .bind(&address.recipient_first_name)
        .bind(&address.recipient_last_name)
        .bind(&address.phone_number)
        .bind(&address.address_line1)
        .bind(&address.address_line2)
        .bind(&address.city)
        .bind(&address.state)
        .bind(&address.zip_code)
        .bind(&address.country)
        .bind(address.is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            // The partial unique index can still fire when the owner had no
            // rows to lock; that is a lost default race, not a duplicate.
            if violated_constraint(&e) == Some("addresses_one_default_per_user") {
                return RepositoryError::Conflict(
                    "another request set a default address at the same time; retry".to_owned(),
                );
            }
            conflict_on_unique(e, "an identical address already exists")
        })?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Apply a partial update to an address, scoped to its owner.
    ///
    /// The row is locked for the duration of the transaction. When the patch
    /// sets `is_default = true`, sibling defaults are cleared before the
    /// update lands.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address belongs to the owner.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        owner: UserId,
        id: AddressId,
        patch: &AddressPatch,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if patch.is_default == Some(true) {
            Self::lock_owner_rows(&mut tx, owner).await?;
        }

        let current = sqlx::query_as::<_, AddressRow>(&format!(
            "SELECT {ADDRESS_COLUMNS} FROM addresses \
             WHERE id = $1 AND user_id = $2 FOR UPDATE"
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        if patch.is_default == Some(true) {
            sqlx::query(
                "UPDATE addresses SET is_default = FALSE \
                 WHERE user_id = $1 AND is_default AND id <> $2",
            )
            .bind(owner)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        }

        // Merge the patch over the current row; absent fields keep their value.
        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE addresses SET \
               label = $1, recipient_first_name = $2, recipient_last_name = $3, \
               phone_number = $4, address_line1 = $5, address_line2 = $6, \
               city = $7, state = $8, zip_code = $9, country = $10, \
               is_default = $11, updated_at = NOW() \
             WHERE id = $12 \
             RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(patch.label.as_ref().or(current.label.as_ref()))
        .bind(
            patch
                .recipient_first_name
                .as_ref()
                .unwrap_or(&current.recipient_first_name),
        )
        .bind(
            patch
                .recipient_last_name
                .as_ref()
                .or(current.recipient_last_name.as_ref()),
        )
        .bind(patch.phone_number.as_ref().unwrap_or(&current.phone_number))
        .bind(
            patch
                .address_line1
                .as_ref()
                .unwrap_or(&current.address_line1),
        )
        .bind(
            patch
                .address_line2
                .as_ref()
                .or(current.address_line2.as_ref()),
        )
        .bind(patch.city.as_ref().unwrap_or(&current.city))
        .bind(patch.state.as_ref().unwrap_or(&current.state))
        .bind(patch.zip_code.as_ref().unwrap_or(&current.zip_code))
        .bind(patch.country.as_ref().unwrap_or(&current.country))
        .bind(patch.is_default.unwrap_or(current.is_default))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Make the given address the owner's single default.
    ///
    /// Atomic clear-then-set: the owner's address rows are locked, every
    /// default for the owner is cleared, then the flag is set on the target.
    /// Two concurrent calls for the same owner serialize on the locks, so
    /// exactly one default survives.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such address belongs to the owner.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_default(
        &self,
        owner: UserId,
        id: AddressId,
    ) -> Result<Address, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let owned = Self::lock_owner_rows(&mut tx, owner).await?;
        if !owned.contains(&id) {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("UPDATE addresses SET is_default = FALSE WHERE user_id = $1 AND is_default")
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        let row = sqlx::query_as::<_, AddressRow>(&format!(
            "UPDATE addresses SET is_default = TRUE, updated_at = NOW() \
             WHERE id = $1 RETURNING {ADDRESS_COLUMNS}"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(row.into())
    }

    /// Delete an address, scoped to its owner.
    ///
    /// # Returns
    ///
    /// Returns `true` if the address was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, owner: UserId, id: AddressId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM addresses WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
