//! Address service.
//!
//! Input validation on top of the repository, which owns the transactional
//! single-default invariant.

use sqlx::PgPool;
use thiserror::Error;

use akubata_core::{AddressId, UserId};

use crate::db::RepositoryError;
use crate::db::addresses::AddressRepository;
use crate::models::{Address, AddressPatch, NewAddress};

/// Errors from address operations.
#[derive(Debug, Error)]
pub enum AddressError {
    /// Required field missing or empty.
    #[error("{0}")]
    Validation(String),

    /// An identical address already exists for this user.
    #[error("{0}")]
    Duplicate(String),

    /// Address not found for this user.
    #[error("address not found")]
    NotFound,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AddressError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::Conflict(message) => Self::Duplicate(message),
            other => Self::Repository(other),
        }
    }
}

/// Address service.
pub struct AddressService<'a> {
    addresses: AddressRepository<'a>,
}

impl<'a> AddressService<'a> {
    /// Create a new address service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            addresses: AddressRepository::new(pool),
        }
    }

    /// List the owner's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Repository` if the database operation fails.
    pub async fn list(&self, owner: UserId) -> Result<Vec<Address>, AddressError> {
        Ok(self.addresses.list(owner).await?)
    }

    /// Get one of the owner's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound` if it doesn't exist or belongs to
    /// someone else.
    pub async fn get(&self, owner: UserId, id: AddressId) -> Result<Address, AddressError> {
        self.addresses
            .get(owner, id)
            .await?
            .ok_or(AddressError::NotFound)
    }

    /// Get the owner's default address, if any.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Repository` if the database operation fails.
    pub async fn get_default(&self, owner: UserId) -> Result<Option<Address>, AddressError> {
        Ok(self.addresses.get_default(owner).await?)
    }

    /// Create an address for the owner.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Validation` for missing required fields.
    /// Returns `AddressError::Duplicate` for an identical existing address.
    pub async fn create(
        &self,
        owner: UserId,
        address: &NewAddress,
    ) -> Result<Address, AddressError> {
        validate_required(&[
            ("recipient_first_name", &address.recipient_first_name),
            ("phone_number", &address.phone_number),
            ("address_line1", &address.address_line1),
            ("city", &address.city),
            ("state", &address.state),
            ("zip_code", &address.zip_code),
            ("country", &address.country),
        ])?;

        Ok(self.addresses.create(owner, address).await?)
    }

    /// Apply a partial update to one of the owner's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::Validation` for an empty patch.
    /// Returns `AddressError::NotFound` if it doesn't exist or belongs to
    /// someone else.
    pub async fn update(
        &self,
        owner: UserId,
        id: AddressId,
        patch: &AddressPatch,
    ) -> Result<Address, AddressError> {
        if patch.is_empty() {
            return Err(AddressError::Validation(
                "no fields provided to update".to_owned(),
            ));
        }

        Ok(self.addresses.update(owner, id, patch).await?)
    }

    /// Make an address the owner's single default.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound` if it doesn't exist or belongs to
    /// someone else.
    pub async fn set_default(&self, owner: UserId, id: AddressId) -> Result<Address, AddressError> {
        Ok(self.addresses.set_default(owner, id).await?)
    }

    /// Delete one of the owner's addresses.
    ///
    /// # Errors
    ///
    /// Returns `AddressError::NotFound` if it doesn't exist or belongs to
    /// someone else.
    pub async fn delete(&self, owner: UserId, id: AddressId) -> Result<(), AddressError> {
        if self.addresses.delete(owner, id).await? {
            Ok(())
        } else {
            Err(AddressError::NotFound)
        }
    }
}

fn validate_required(fields: &[(&str, &str)]) -> Result<(), AddressError> {
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(AddressError::Validation(format!("{name} is required")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_must_be_non_empty() {
        assert!(validate_required(&[("city", "Lagos")]).is_ok());

        let err = validate_required(&[("city", "  ")]).unwrap_err();
        assert!(matches!(err, AddressError::Validation(m) if m == "city is required"));
    }
}
