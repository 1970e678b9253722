//! Product domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use bazaar_core::{Price, ProductCategory, ProductId, UserId};

/// A catalog listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Owning seller, if any. Seeded products may have no seller.
    pub seller_id: Option<UserId>,
    /// Display name (1-200 characters).
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Current unit price.
    pub price: Price,
    /// Top-level category.
    pub category: Option<ProductCategory>,
    /// Free-text subcategory (e.g. "Smartphones" under electronics).
    pub subcategory: Option<String>,
    /// Units in stock.
    pub stock: i32,
    /// Image URL.
    pub image: Option<String>,
    /// When the listing was created.
    pub created_at: DateTime<Utc>,
    /// When the listing was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Whether `user` owns this listing.
    ///
    /// Products without a seller are owned by nobody; they can only be
    /// changed out-of-band (seed tooling).
    #[must_use]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.seller_id == Some(user)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn sample_product(id: i32, seller: Option<i32>, price: Price) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(id),
            seller_id: seller.map(UserId::new),
            name: format!("Product {id}"),
            description: String::new(),
            price,
            category: Some(ProductCategory::Electronics),
            subcategory: None,
            stock: 10,
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_ownership() {
        let price = Price::new(Decimal::new(1000, 2)).unwrap();
        let owned = sample_product(1, Some(7), price);
        assert!(owned.is_owned_by(UserId::new(7)));
        assert!(!owned.is_owned_by(UserId::new(8)));

        let orphan = sample_product(2, None, price);
        assert!(!orphan.is_owned_by(UserId::new(7)));
    }
}
