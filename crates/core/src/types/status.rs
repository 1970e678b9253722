//! Role and status enums for users, products, and orders.
//!
//! Each enum maps to a PostgreSQL enum type of the same (snake_case) name in
//! the `shop` schema when the `postgres` feature is enabled.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Account role.
///
/// An explicit two-tier role rather than an overloaded staff/admin flag:
/// sellers may list products for sale, buyers may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.user_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular customer account.
    #[default]
    Buyer,
    /// Account privileged to create catalog listings.
    Seller,
}

impl UserRole {
    /// Whether this role may create products.
    #[must_use]
    pub const fn can_sell(self) -> bool {
        matches!(self, Self::Seller)
    }
}

/// Product catalog category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.product_category", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    Electronics,
    Fashion,
    Beauty,
    Appliances,
}

impl ProductCategory {
    /// The wire/database name of this category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Fashion => "fashion",
            Self::Beauty => "beauty",
            Self::Appliances => "appliances",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown product category: {0}")]
pub struct UnknownCategory(pub String);

impl std::str::FromStr for ProductCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "electronics" => Ok(Self::Electronics),
            "fashion" => Ok(Self::Fashion),
            "beauty" => Ok(Self::Beauty),
            "appliances" => Ok(Self::Appliances),
            other => Err(UnknownCategory(other.to_owned())),
        }
    }
}

/// Order lifecycle status.
///
/// The only mutable part of an order after checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.order_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

/// Payment method selected at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.payment_method", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery (the default).
    #[default]
    Cod,
    /// Credit/debit card.
    Card,
    /// UPI transfer.
    Upi,
    /// Monthly installments.
    Emi,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_role_can_sell() {
        assert!(UserRole::Seller.can_sell());
        assert!(!UserRole::Buyer.can_sell());
        assert_eq!(UserRole::default(), UserRole::Buyer);
    }

    #[test]
    fn test_category_parse_roundtrip() {
        for category in [
            ProductCategory::Electronics,
            ProductCategory::Fashion,
            ProductCategory::Beauty,
            ProductCategory::Appliances,
        ] {
            assert_eq!(category.as_str().parse::<ProductCategory>().unwrap(), category);
        }
    }

    #[test]
    fn test_category_parse_unknown() {
        assert!("groceries".parse::<ProductCategory>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Cod).unwrap(),
            "\"cod\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let status: OrderStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
    }
}
