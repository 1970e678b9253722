//! Non-negative fixed-point price type.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative")]
    Negative,
    /// The amount has more than two decimal places.
    #[error("price cannot have more than two decimal places")]
    TooPrecise,
    /// The amount exceeds the storable range.
    #[error("price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: Decimal,
    },
}

/// A product or order price.
///
/// Wraps a [`Decimal`] constrained to the range storable in a
/// `NUMERIC(10, 2)` column: non-negative, at most two decimal places,
/// less than 100,000,000.
///
/// Serializes as a decimal string (e.g. `"1299.00"`).
///
/// ## Examples
///
/// ```
/// use bazaar_core::Price;
/// use rust_decimal::Decimal;
///
/// let unit = Price::new(Decimal::new(9999, 2)).unwrap(); // 99.99
/// assert_eq!(unit.amount(), Decimal::new(9999, 2));
///
/// assert!(Price::new(Decimal::new(-1, 0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Exclusive upper bound for a price (NUMERIC(10, 2) capacity).
    pub const MAX_EXCLUSIVE: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

    /// Create a new price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, has more than two decimal
    /// places, or is too large for the storage column.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.scale() > 2 && amount.normalize().scale() > 2 {
            return Err(PriceError::TooPrecise);
        }
        if amount >= Self::MAX_EXCLUSIVE {
            return Err(PriceError::TooLarge {
                max: Self::MAX_EXCLUSIVE,
            });
        }
        Ok(Self(amount))
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// The total for a line of `quantity` units at this unit price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Sum `(unit price, quantity)` lines into a single validated total.
    ///
    /// Unlike `line_total`/`Sum`, the result is re-checked against the
    /// storable range, so a cart of individually valid prices cannot
    /// produce a total the price column rejects.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::TooLarge`] if the total reaches
    /// [`Self::MAX_EXCLUSIVE`].
    pub fn checked_total<I>(lines: I) -> Result<Self, PriceError>
    where
        I: IntoIterator<Item = (Self, u32)>,
    {
        let total: Decimal = lines
            .into_iter()
            .map(|(price, quantity)| price.0 * Decimal::from(quantity))
            .sum();
        Self::new(total)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Qualified call: Decimal has an inherent `deserialize([u8; 16])`
        // that would otherwise shadow the serde trait method.
        let amount = <Decimal as Deserialize>::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

// SQLx support (with postgres feature): delegates to Decimal / NUMERIC.
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Price {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <Decimal as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <Decimal as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Price {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let amount = <Decimal as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are constrained by the column CHECK
        Ok(Self(amount))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <Decimal as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}
