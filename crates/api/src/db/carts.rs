//! Cart repository.
//!
//! Quantity changes are single atomic statements so concurrent requests
//! against the same cart cannot lose updates: the add path is an upsert that
//! increments in place, and the set/remove paths are single UPDATE/DELETE
//! statements keyed on (cart, product).

use sqlx::{PgPool, Row};

use bazaar_core::{CartId, ProductId, UserId};

use super::RepositoryError;
use super::products::{JOINED_PRODUCT_COLUMNS, product_from_joined_row};
use crate::models::{Cart, CartItem, CartLine};

const CART_COLUMNS: &str = "id, user_id, created_at, updated_at";
const CART_ITEM_COLUMNS: &str = "id, cart_id, product_id, quantity, created_at, updated_at";

/// Repository for carts and their line items.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the user's cart, creating an empty one if absent. Idempotent.
    ///
    /// The no-op `DO UPDATE` makes `RETURNING` yield the existing row on
    /// conflict, so creation races resolve to the same cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_or_create(&self, user_id: UserId) -> Result<Cart, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "INSERT INTO shop.cart (user_id)
             VALUES ($1)
             ON CONFLICT (user_id) DO UPDATE SET user_id = EXCLUDED.user_id
             RETURNING {CART_COLUMNS}"
        ))
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(cart)
    }

    /// Get the user's cart without creating one.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(&format!(
            "SELECT {CART_COLUMNS} FROM shop.cart WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Load all lines of a cart with their products, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items(&self, cart_id: CartId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT ci.id, ci.cart_id, ci.product_id, ci.quantity,
                    ci.created_at, ci.updated_at,
                    {JOINED_PRODUCT_COLUMNS}
             FROM shop.cart_item ci
             JOIN shop.product p ON p.id = ci.product_id
             WHERE ci.cart_id = $1
             ORDER BY ci.created_at ASC"
        ))
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        let mut lines = Vec::with_capacity(rows.len());
        for row in rows {
            let item = CartItem {
                id: row.try_get("id")?,
                cart_id: row.try_get("cart_id")?,
                product_id: row.try_get("product_id")?,
                quantity: row.try_get("quantity")?,
                created_at: row.try_get("created_at")?,
                updated_at: row.try_get("updated_at")?,
            };
            let product = product_from_joined_row(&row)?;
            lines.push(CartLine { item, product });
        }

        Ok(lines)
    }

    /// Add `quantity` units of a product to the cart.
    ///
    /// If a line for this product already exists its quantity is incremented
    /// in place; otherwise a new line is created. One atomic statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails (including a
    /// foreign-key violation for a vanished product; callers check product
    /// existence first for a clean 404).
    pub async fn add_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "INSERT INTO shop.cart_item AS ci (cart_id, product_id, quantity)
             VALUES ($1, $2, $3)
             ON CONFLICT (cart_id, product_id)
             DO UPDATE SET quantity = ci.quantity + EXCLUDED.quantity, updated_at = now()
             RETURNING {CART_ITEM_COLUMNS}"
        ))
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(item)
    }

    /// Overwrite the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no line exists for this
    /// (cart, product) pair.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_quantity(
        &self,
        cart_id: CartId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(&format!(
            "UPDATE shop.cart_item
             SET quantity = $3, updated_at = now()
             WHERE cart_id = $1 AND product_id = $2
             RETURNING {CART_ITEM_COLUMNS}"
        ))
        .bind(cart_id)
        .bind(product_id)
        .bind(quantity)
        .fetch_optional(self.pool)
        .await?;

        item.ok_or(RepositoryError::NotFound)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no line exists for this
    /// (cart, product) pair.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn remove_item(
        &self,
        cart_id: CartId,
        product_id: ProductId,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("DELETE FROM shop.cart_item WHERE cart_id = $1 AND product_id = $2")
                .bind(cart_id)
                .bind(product_id)
                .execute(self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
