//! Cart domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{CartId, CartItemId, Price, ProductId, UserId};

use super::Product;

/// A user's cart (1:1 with the user, lazily created).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Cart {
    /// Unique cart ID.
    pub id: CartId,
    /// Owning user.
    pub user_id: UserId,
    /// When the cart was first created.
    pub created_at: DateTime<Utc>,
    /// When the cart was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A single cart line: one product with a quantity.
///
/// At most one line exists per (cart, product) pair; repeated adds increment
/// the quantity.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CartItem {
    /// Unique line ID.
    pub id: CartItemId,
    /// Owning cart.
    #[serde(skip_serializing)]
    pub cart_id: CartId,
    /// Referenced product.
    pub product_id: ProductId,
    /// Units of the product (always >= 1).
    pub quantity: i32,
    /// When the line was first added.
    pub created_at: DateTime<Utc>,
    /// When the quantity was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A cart line joined with its product, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct CartLine {
    /// The line item.
    #[serde(flatten)]
    pub item: CartItem,
    /// The referenced product, with its live price.
    pub product: Product,
}

impl CartLine {
    /// Live price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        let quantity = u32::try_from(self.item.quantity).unwrap_or(0);
        self.product.price.line_total(quantity)
    }
}

/// A cart with all of its lines.
#[derive(Debug, Clone, Serialize)]
pub struct CartWithItems {
    /// The cart row.
    #[serde(flatten)]
    pub cart: Cart,
    /// All lines, oldest first.
    pub items: Vec<CartLine>,
}

impl CartWithItems {
    /// Live subtotal over all lines at current product prices.
    ///
    /// This is the amount a checkout at this instant would freeze into the
    /// order's `total_price`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use bazaar_core::ProductCategory;
    use rust_decimal::Decimal;

    fn product(id: i32, cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            seller_id: None,
            name: format!("Product {id}"),
            description: String::new(),
            price: Price::new(Decimal::new(cents, 2)).unwrap(),
            category: Some(ProductCategory::Electronics),
            subcategory: None,
            stock: 5,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn line(item_id: i32, product: Product, quantity: i32) -> CartLine {
        let now = Utc::now();
        CartLine {
            item: CartItem {
                id: CartItemId::new(item_id),
                cart_id: CartId::new(1),
                product_id: product.id,
                quantity,
                created_at: now,
                updated_at: now,
            },
            product,
        }
    }

    fn cart(items: Vec<CartLine>) -> CartWithItems {
        let now = Utc::now();
        CartWithItems {
            cart: Cart {
                id: CartId::new(1),
                user_id: UserId::new(1),
                created_at: now,
                updated_at: now,
            },
            items,
        }
    }

    #[test]
    fn test_subtotal_sums_lines_at_unit_price() {
        // 100.00 x 2 + 50.00 x 1 = 250.00
        let cart = cart(vec![
            line(1, product(1, 10000), 2),
            line(2, product(2, 5000), 1),
        ]);
        assert_eq!(cart.subtotal().amount(), Decimal::new(25000, 2));
    }

    #[test]
    fn test_subtotal_empty_cart_is_zero() {
        let cart = cart(vec![]);
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::ZERO);
    }

    #[test]
    fn test_line_total() {
        let l = line(1, product(1, 129_900), 3); // 1299.00 x 3
        assert_eq!(l.line_total().amount(), Decimal::new(389_700, 2));
    }

    #[test]
    fn test_cart_serializes_with_embedded_products() {
        let cart = cart(vec![line(1, product(9, 4999), 2)]);
        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(json["items"][0]["quantity"], 2);
        assert_eq!(json["items"][0]["product"]["id"], 9);
        assert_eq!(json["items"][0]["product"]["price"], "49.99");
        // Internal FK is not exposed
        assert!(json["items"][0].get("cart_id").is_none());
    }
}
