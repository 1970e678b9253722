//! Product repository and catalog filtering.

use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use bazaar_core::{Price, ProductCategory, ProductId, UserId};

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str =
    "id, seller_id, name, description, price, category, subcategory, stock, image, \
     created_at, updated_at";

/// Catalog listing filter. All fields are optional and combine with AND.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    /// Case-insensitive substring match over name OR description.
    pub search: Option<String>,
    /// Exact category match.
    pub category: Option<ProductCategory>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

/// Fields written on product create and full update.
#[derive(Debug, Clone)]
pub struct ProductData {
    pub name: String,
    pub description: String,
    pub price: Price,
    pub category: Option<ProductCategory>,
    pub subcategory: Option<String>,
    pub stock: i32,
    pub image: Option<String>,
}

/// Repository for catalog rows.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List products matching `filter`, newest first.
    ///
    /// No pagination: the full matching set is returned.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<Product>, RepositoryError> {
        let pattern = filter
            .search
            .as_deref()
            .map(|s| format!("%{}%", escape_like(s)));

        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM shop.product
             WHERE ($1 IS NULL OR name ILIKE $1 OR description ILIKE $1)
               AND ($2 IS NULL OR category = $2)
               AND ($3 IS NULL OR price >= $3)
               AND ($4 IS NULL OR price <= $4)
             ORDER BY created_at DESC"
        ))
        .bind(pattern)
        .bind(filter.category)
        .bind(filter.min_price)
        .bind(filter.max_price)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Create a product owned by `seller`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(
        &self,
        data: &ProductData,
        seller: Option<UserId>,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO shop.product
                 (seller_id, name, description, price, category, subcategory, stock, image)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(seller)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.category)
        .bind(&data.subcategory)
        .bind(data.stock)
        .bind(&data.image)
        .fetch_one(self.pool)
        .await?;

        Ok(product)
    }

    /// Replace a product's mutable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: ProductId,
        data: &ProductData,
    ) -> Result<Product, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "UPDATE shop.product
             SET name = $2, description = $3, price = $4, category = $5,
                 subcategory = $6, stock = $7, image = $8, updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.description)
        .bind(data.price)
        .bind(data.category)
        .bind(&data.subcategory)
        .bind(data.stock)
        .bind(&data.image)
        .fetch_optional(self.pool)
        .await?;

        product.ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM shop.product WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Column list for a product joined into another query, aliased with a `p_`
/// prefix where names would collide with the left side.
pub(crate) const JOINED_PRODUCT_COLUMNS: &str =
    "p.id AS p_id, p.seller_id, p.name, p.description, p.price, p.category, p.subcategory, \
     p.stock, p.image, p.created_at AS p_created_at, p.updated_at AS p_updated_at";

/// Rebuild a [`Product`] from a row selected with [`JOINED_PRODUCT_COLUMNS`].
///
/// Callers must check that the join matched (`p_id` non-null) first.
pub(crate) fn product_from_joined_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("p_id")?,
        seller_id: row.try_get("seller_id")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        price: row.try_get("price")?,
        category: row.try_get("category")?,
        subcategory: row.try_get("subcategory")?,
        stock: row.try_get("stock")?,
        image: row.try_get("image")?,
        created_at: row.try_get("p_created_at")?,
        updated_at: row.try_get("p_updated_at")?,
    })
}

/// Escape `%`, `_`, and `\` so user input matches literally inside a
/// LIKE/ILIKE pattern.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_passthrough() {
        assert_eq!(escape_like("laptop"), "laptop");
    }

    #[test]
    fn test_escape_like_wildcards() {
        assert_eq!(escape_like("100%_cotton"), "100\\%\\_cotton");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }

    #[test]
    fn test_filter_default_is_unfiltered() {
        let filter = ProductFilter::default();
        assert!(filter.search.is_none());
        assert!(filter.category.is_none());
        assert!(filter.min_price.is_none());
        assert!(filter.max_price.is_none());
    }
}
