//! Order domain types.
//!
//! An order is a frozen snapshot of a cart at checkout time. Only `status`
//! changes after creation; totals and item prices never do.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{OrderId, OrderItemId, OrderStatus, PaymentMethod, Price, ProductId, UserId};

use super::Product;

/// A completed checkout.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Owning user.
    pub user_id: UserId,
    /// Total frozen at checkout; never recomputed.
    pub total_price: Price,
    /// Lifecycle status (the only mutable field).
    pub status: OrderStatus,
    /// Payment method chosen at checkout.
    pub payment_method: PaymentMethod,
    /// Free-text shipping address.
    pub shipping_address: String,
    /// Checkout timestamp.
    pub created_at: DateTime<Utc>,
    /// Last status change.
    pub updated_at: DateTime<Utc>,
}

/// A frozen copy of one cart line at checkout.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct OrderItem {
    /// Unique item ID.
    pub id: OrderItemId,
    /// Owning order.
    #[serde(skip_serializing)]
    pub order_id: OrderId,
    /// Referenced product; `None` once the product is deleted.
    pub product_id: Option<ProductId>,
    /// Units ordered.
    pub quantity: i32,
    /// Unit price captured at checkout, immune to later catalog changes.
    pub price: Price,
}

/// An order item joined with its product (if it still exists).
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    /// The frozen item.
    #[serde(flatten)]
    pub item: OrderItem,
    /// The product as it exists today, or `None` if deleted since.
    pub product: Option<Product>,
}

/// An order with all of its items, as returned by the API.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    /// The order row.
    #[serde(flatten)]
    pub order: Order,
    /// Frozen line items.
    pub items: Vec<OrderLine>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_order_serializes_flattened_with_items() {
        let now = Utc::now();
        let order = OrderWithItems {
            order: Order {
                id: OrderId::new(5),
                user_id: UserId::new(2),
                total_price: Price::new(Decimal::new(25000, 2)).unwrap(),
                status: OrderStatus::Pending,
                payment_method: PaymentMethod::Cod,
                shipping_address: "12 Hill Road".to_owned(),
                created_at: now,
                updated_at: now,
            },
            items: vec![OrderLine {
                item: OrderItem {
                    id: OrderItemId::new(1),
                    order_id: OrderId::new(5),
                    product_id: Some(ProductId::new(3)),
                    quantity: 2,
                    price: Price::new(Decimal::new(10000, 2)).unwrap(),
                },
                product: None,
            }],
        };

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["id"], 5);
        assert_eq!(json["total_price"], "250.00");
        assert_eq!(json["status"], "pending");
        assert_eq!(json["payment_method"], "cod");
        assert_eq!(json["items"][0]["price"], "100.00");
        assert_eq!(json["items"][0]["product"], serde_json::Value::Null);
        assert!(json["items"][0].get("order_id").is_none());
    }
}
