//! Order repository: checkout and order queries.

use sqlx::{PgPool, Row};

use bazaar_core::{CartId, OrderId, OrderStatus, PaymentMethod, Price, UserId};

use super::RepositoryError;
use super::products::{JOINED_PRODUCT_COLUMNS, product_from_joined_row};
use crate::models::{Order, OrderItem, OrderLine, OrderWithItems};

const ORDER_COLUMNS: &str =
    "id, user_id, total_price, status, payment_method, shipping_address, created_at, updated_at";

/// Errors from the checkout transition.
#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    /// The user has no cart at all (never added anything).
    #[error("cart not found")]
    NoCart,

    /// The cart exists but holds no items; a zero-item order is never
    /// created.
    #[error("cannot check out an empty cart")]
    EmptyCart,

    /// The cart total exceeds what the order's price column can store.
    #[error("cart total exceeds the maximum order value")]
    TotalTooLarge,

    /// Underlying repository failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<sqlx::Error> for CheckoutError {
    fn from(e: sqlx::Error) -> Self {
        Self::Repository(RepositoryError::Database(e))
    }
}

/// Repository for orders and their frozen items.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Convert the user's cart into an order.
    ///
    /// Runs as one transaction:
    /// 1. Lock the cart row (`FOR UPDATE`) so concurrent checkouts of the
    ///    same cart serialize.
    /// 2. Load the cart lines with live product prices.
    /// 3. Insert the order with `total = sum(price * quantity)`.
    /// 4. Insert one order item per line, freezing each unit price.
    /// 5. Delete the cart lines (the cart row itself stays).
    ///
    /// A failure at any step rolls the whole transition back: there is never
    /// an order without its items or a half-emptied cart.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::NoCart`] if the user has no cart,
    /// [`CheckoutError::EmptyCart`] if it has no items,
    /// [`CheckoutError::TotalTooLarge`] if the total would not fit the price
    /// column, and [`CheckoutError::Repository`] for database failures.
    pub async fn checkout(
        &self,
        user_id: UserId,
        payment_method: PaymentMethod,
        shipping_address: &str,
    ) -> Result<OrderWithItems, CheckoutError> {
        let mut tx = self.pool.begin().await?;

        let cart_id: Option<CartId> =
            sqlx::query_scalar("SELECT id FROM shop.cart WHERE user_id = $1 FOR UPDATE")
                .bind(user_id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some(cart_id) = cart_id else {
            return Err(CheckoutError::NoCart);
        };

        let rows = sqlx::query(&format!(
            "SELECT ci.quantity, {JOINED_PRODUCT_COLUMNS}
             FROM shop.cart_item ci
             JOIN shop.product p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at ASC"
        ))
        .bind(cart_id)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let quantity: i32 = row.try_get("quantity")?;
            let product = product_from_joined_row(&row)?;
            lines.push((quantity, product));
        }

        let total = Price::checked_total(
            lines
                .iter()
                .map(|(quantity, product)| (product.price, u32::try_from(*quantity).unwrap_or(0))),
        )
        .map_err(|_| CheckoutError::TotalTooLarge)?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO shop.customer_order
                 (user_id, total_price, payment_method, shipping_address)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(user_id)
        .bind(total)
        .bind(payment_method)
        .bind(shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(lines.len());
        for (quantity, product) in lines {
            let item = sqlx::query_as::<_, OrderItem>(
                "INSERT INTO shop.order_item (order_id, product_id, quantity, price)
                 VALUES ($1, $2, $3, $4)
                 RETURNING id, order_id, product_id, quantity, price",
            )
            .bind(order.id)
            .bind(product.id)
            .bind(quantity)
            .bind(product.price)
            .fetch_one(&mut *tx)
            .await?;

            items.push(OrderLine {
                item,
                product: Some(product),
            });
        }

        sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1")
            .bind(cart_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(OrderWithItems { order, items })
    }

    /// List the user's orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, user_id: UserId) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM shop.customer_order
             WHERE user_id = $1
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        let mut result = Vec::with_capacity(orders.len());
        for order in orders {
            let items = self.items(order.id).await?;
            result.push(OrderWithItems { order, items });
        }

        Ok(result)
    }

    /// Get one of the user's orders with its items.
    ///
    /// Another user's order id resolves to `None`: ownership misses are
    /// indistinguishable from absence.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(
        &self,
        id: OrderId,
        user_id: UserId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS}
             FROM shop.customer_order
             WHERE id = $1 AND user_id = $2"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = self.items(order.id).await?;
        Ok(Some(OrderWithItems { order, items }))
    }

    /// Update the status of one of the user's orders.
    ///
    /// Status is the only mutable field; totals and items are frozen.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist or
    /// belongs to another user.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update_status(
        &self,
        id: OrderId,
        user_id: UserId,
        status: OrderStatus,
    ) -> Result<OrderWithItems, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE shop.customer_order
             SET status = $3, updated_at = now()
             WHERE id = $1 AND user_id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        let order = order.ok_or(RepositoryError::NotFound)?;
        let items = self.items(order.id).await?;
        Ok(OrderWithItems { order, items })
    }

    /// Load the frozen items of an order, with today's product record where
    /// it still exists.
    async fn items(&self, order_id: OrderId) -> Result<Vec<OrderLine>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT oi.id, oi.order_id, oi.product_id, oi.quantity, oi.price,
                    {JOINED_PRODUCT_COLUMNS}
             FROM shop.order_item oi
             LEFT JOIN shop.product p ON p.id = oi.product_id
             WHERE oi.order_id = $1
             ORDER BY oi.id ASC"
        ))
        .bind(order_id)
        .fetch_all(self.pool)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let item = OrderItem {
                id: row.try_get("id")?,
                order_id: row.try_get("order_id")?,
                product_id: row.try_get("product_id")?,
                quantity: row.try_get("quantity")?,
                price: row.try_get("price")?,
            };
            // The LEFT JOIN misses once the product is deleted.
            let product = if row.try_get::<Option<i32>, _>("p_id")?.is_some() {
                Some(product_from_joined_row(&row)?)
            } else {
                None
            };
            lines.push(OrderLine { item, product });
        }

        Ok(lines)
    }
}
