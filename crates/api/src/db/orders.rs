//! Order repository.
//!
//! Placing an order is a single transaction: each requested product row is
//! locked with `FOR UPDATE`, its stock checked and decremented, the unit
//! price captured into the line item, and the total accumulated. Any failure
//! rolls back the whole order, so stock never goes negative and no partial
//! orders land. Deleting an order restores the stock it consumed, also
//! transactionally.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use akubata_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, ProductId, UserId};

use super::RepositoryError;
use crate::models::{Order, OrderItem, OrderItemRequest, OrderWithItems};

const ORDER_COLUMNS: &str =
    "id, user_id, order_status, payment_method, total_amount, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    order_status: OrderStatus,
    payment_method: PaymentMethod,
    total_amount: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            order_status: row.order_status,
            payment_method: row.payment_method,
            total_amount: row.total_amount,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    price: Decimal,
    product_name: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            quantity: row.quantity,
            price: row.price,
            product_name: row.product_name,
            created_at: row.created_at,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order for the given items.
    ///
    /// Locks each product row, verifies stock, captures the unit price at
    /// order time, and decrements inventory, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if a product does not exist or is
    /// inactive. Returns `RepositoryError::InsufficientStock` if stock can't
    /// cover a requested quantity. Returns `RepositoryError::Database` for
    /// other database errors.
    pub async fn create(
        &self,
        user_id: UserId,
        payment_method: PaymentMethod,
        items: &[OrderItemRequest],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (user_id, order_status, payment_method, total_amount) \
             VALUES ($1, 'pending', $2, 0) \
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(payment_method)
        .fetch_one(&mut *tx)
        .await?;

        let mut total = Decimal::ZERO;
        let mut order_items = Vec::with_capacity(items.len());

        for item in items {
            // Lock the product row so concurrent orders serialize on it.
            let product: Option<(String, Decimal, i32)> = sqlx::query_as(
                "SELECT product_name, unit_price, stock_quantity FROM products \
                 WHERE id = $1 AND is_active FOR UPDATE",
            )
            .bind(item.product_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some((product_name, unit_price, stock_quantity)) = product else {
                return Err(RepositoryError::NotFound);
            };

            if item.quantity <= 0 || stock_quantity < item.quantity {
                return Err(RepositoryError::InsufficientStock { product_name });
            }

            sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - $1, updated_at = NOW() \
                 WHERE id = $2",
            )
            .bind(item.quantity)
            .bind(item.product_id)
            .execute(&mut *tx)
            .await?;

            let line = sqlx::query_as::<_, OrderItemRow>(
                "INSERT INTO order_items (order_id, product_id, quantity, price) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING id, order_id, product_id, quantity, price, \
                           NULL::text AS product_name, created_at",
            )
            .bind(order.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(unit_price)
            .fetch_one(&mut *tx)
            .await?;

            total += unit_price * Decimal::from(item.quantity);
            let mut line = OrderItem::from(line);
            line.product_name = Some(product_name);
            order_items.push(line);
        }

        let order = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET total_amount = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(total)
        .bind(order.id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderWithItems {
            order: order.into(),
            items: order_items,
        })
    }

    /// List a user's orders, newest first, with their items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// List every order in the store, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_all(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// Get an order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.items_for(id).await?;

        Ok(Some(OrderWithItems {
            order: order.into(),
            items,
        }))
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET order_status = $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    /// Append an item to an existing order at the product's current price.
    ///
    /// Same locking discipline as [`Self::create`]: the product row is
    /// locked, stock checked and decremented, and the order total bumped in
    /// one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order or product is
    /// missing. Returns `RepositoryError::InsufficientStock` when stock
    /// can't cover the quantity. Returns `RepositoryError::Database` for
    /// other database errors.
    pub async fn add_item(
        &self,
        order_id: OrderId,
        item: &OrderItemRequest,
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order: Option<(OrderId,)> =
            sqlx::query_as("SELECT id FROM orders WHERE id = $1 FOR UPDATE")
                .bind(order_id)
                .fetch_optional(&mut *tx)
                .await?;

        if order.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let product: Option<(String, Decimal, i32)> = sqlx::query_as(
            "SELECT product_name, unit_price, stock_quantity FROM products \
             WHERE id = $1 AND is_active FOR UPDATE",
        )
        .bind(item.product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((product_name, unit_price, stock_quantity)) = product else {
            return Err(RepositoryError::NotFound);
        };

        if item.quantity <= 0 || stock_quantity < item.quantity {
            return Err(RepositoryError::InsufficientStock { product_name });
        }

        sqlx::query(
            "UPDATE products SET stock_quantity = stock_quantity - $1, updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(item.quantity)
        .bind(item.product_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(unit_price)
        .execute(&mut *tx)
        .await?;

        let order = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET total_amount = total_amount + $1, updated_at = NOW() \
             WHERE id = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(unit_price * Decimal::from(item.quantity))
        .bind(order_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        let items = self.items_for(order_id).await?;

        Ok(OrderWithItems {
            order: order.into(),
            items,
        })
    }

    /// Delete an order and restore the stock its items consumed.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn delete(&self, id: OrderId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Aggregate per product first: `UPDATE ... FROM` joins each target row
        // to at most one source row, so two line items for the same product
        // would otherwise restore only one of them.
        sqlx::query(
            "UPDATE products p SET stock_quantity = p.stock_quantity + oi.qty, \
                                   updated_at = NOW() \
             FROM (SELECT product_id, SUM(quantity) AS qty \
                   FROM order_items WHERE order_id = $1 \
                   GROUP BY product_id) oi \
             WHERE oi.product_id = p.id",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        // order_items rows go with the order via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    async fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price, \
                    p.product_name, oi.created_at \
             FROM order_items oi \
             LEFT JOIN products p ON p.id = oi.product_id \
             WHERE oi.order_id = $1 \
             ORDER BY oi.created_at ASC",
        )
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderItem::from).collect())
    }

    async fn attach_items(
        &self,
        orders: Vec<OrderRow>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let mut out = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items_for(order.id).await?;
            out.push(OrderWithItems {
                order: order.into(),
                items,
            });
        }
        Ok(out)
    }
}
