//! Order service.
//!
//! Validates requests and owns the access rules: basic users see only their
//! own orders, admin and manager roles see everything.

use sqlx::PgPool;
use thiserror::Error;

use akubata_core::{OrderId, OrderStatus, PaymentMethod, Role, UserId};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::models::{Order, OrderItemRequest, OrderWithItems};

/// Errors from order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Request rejected before reaching the database.
    #[error("{0}")]
    Validation(String),

    /// Order or referenced product not found.
    #[error("order not found")]
    NotFound,

    /// Caller may not see or modify this order.
    #[error("not allowed to access this order")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for OrderError {
    fn from(e: RepositoryError) -> Self {
        match e {
            RepositoryError::NotFound => Self::NotFound,
            RepositoryError::InsufficientStock { product_name } => {
                Self::Validation(format!("insufficient stock for {product_name}"))
            }
            other => Self::Repository(other),
        }
    }
}

/// Order service.
pub struct OrderService<'a> {
    orders: OrderRepository<'a>,
}

impl<'a> OrderService<'a> {
    /// Create a new order service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            orders: OrderRepository::new(pool),
        }
    }

    /// Place an order for the caller.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Validation` for an empty item list, a
    /// non-positive quantity, or insufficient stock.
    /// Returns `OrderError::NotFound` for an unknown or inactive product.
    pub async fn create(
        &self,
        owner: UserId,
        payment_method: PaymentMethod,
        items: &[OrderItemRequest],
    ) -> Result<OrderWithItems, OrderError> {
        if items.is_empty() {
            return Err(OrderError::Validation(
                "order must contain at least one item".to_owned(),
            ));
        }
        if let Some(item) = items.iter().find(|i| i.quantity <= 0) {
            return Err(OrderError::Validation(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }

        Ok(self.orders.create(owner, payment_method, items).await?)
    }

    /// List the orders visible to the caller.
    ///
    /// Admin and manager roles see every order; everyone else sees their own.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Repository` if the database operation fails.
    pub async fn list(&self, caller: UserId, role: Role) -> Result<Vec<OrderWithItems>, OrderError> {
        let orders = if role.can_manage_catalog() {
            self.orders.list_all().await?
        } else {
            self.orders.list_for_user(caller).await?
        };

        Ok(orders)
    }

    /// Get an order, enforcing visibility.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` for a missing order and
    /// `OrderError::Forbidden` when a basic user asks for someone else's.
    pub async fn get(
        &self,
        caller: UserId,
        role: Role,
        id: OrderId,
    ) -> Result<OrderWithItems, OrderError> {
        let order = self.orders.get(id).await?.ok_or(OrderError::NotFound)?;

        if order.order.user_id != caller && !role.can_manage_catalog() {
            return Err(OrderError::Forbidden);
        }

        Ok(order)
    }

    /// Update an order's status (admin/manager).
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        Ok(self.orders.update_status(id, status).await?)
    }

    /// Append an item to an order, enforcing visibility.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` / `OrderError::Forbidden` as in
    /// [`Self::get`], `OrderError::Validation` for bad quantities or stock.
    pub async fn add_item(
        &self,
        caller: UserId,
        role: Role,
        id: OrderId,
        item: &OrderItemRequest,
    ) -> Result<OrderWithItems, OrderError> {
        if item.quantity <= 0 {
            return Err(OrderError::Validation(format!(
                "quantity for product {} must be positive",
                item.product_id
            )));
        }

        // Visibility check before touching stock.
        self.get(caller, role, id).await?;

        Ok(self.orders.add_item(id, item).await?)
    }

    /// Delete an order and restore its stock, enforcing visibility.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` / `OrderError::Forbidden` as in
    /// [`Self::get`].
    pub async fn delete(&self, caller: UserId, role: Role, id: OrderId) -> Result<(), OrderError> {
        self.get(caller, role, id).await?;

        if self.orders.delete(id).await? {
            Ok(())
        } else {
            Err(OrderError::NotFound)
        }
    }
}
