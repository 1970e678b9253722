//! Catalog routes: list, search, and seller CRUD.

use std::str::FromStr;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;

use bazaar_core::{Price, ProductCategory, ProductId, UserId};

use crate::db::products::{ProductData, ProductFilter, ProductRepository};
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::Product;
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 200;

/// Router for catalog routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/{id}", get(show).put(update).delete(delete))
}

/// Catalog query parameters. Unknown parameters are rejected rather than
/// silently ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

impl ListQuery {
    /// Parse the raw query parameters into a typed filter.
    ///
    /// Empty parameters (e.g. `?search=`) are treated as absent, the way
    /// browser forms submit untouched fields.
    fn into_filter(self) -> Result<ProductFilter> {
        let category = match non_empty(self.category) {
            Some(raw) => Some(
                ProductCategory::from_str(&raw)
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            ),
            None => None,
        };

        Ok(ProductFilter {
            search: non_empty(self.search),
            category,
            min_price: parse_price_bound("min_price", self.min_price)?,
            max_price: parse_price_bound("max_price", self.max_price)?,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

fn parse_price_bound(name: &str, value: Option<String>) -> Result<Option<Decimal>> {
    match non_empty(value) {
        Some(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{name} must be a decimal number"))),
        None => Ok(None),
    }
}

/// Listing create/replace request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductPayload {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Price,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub stock: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
}

impl ProductPayload {
    /// Validate the payload into repository-ready fields.
    fn into_data(self) -> Result<ProductData> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(AppError::Validation("name must not be empty".to_owned()));
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(AppError::Validation(format!(
                "name must be at most {MAX_NAME_LENGTH} characters"
            )));
        }

        let stock = self.stock.unwrap_or(0);
        if stock < 0 {
            return Err(AppError::Validation(
                "stock must not be negative".to_owned(),
            ));
        }

        let category = match non_empty(self.category) {
            Some(raw) => Some(
                ProductCategory::from_str(&raw)
                    .map_err(|e| AppError::Validation(e.to_string()))?,
            ),
            None => None,
        };

        Ok(ProductData {
            name,
            description: self.description.unwrap_or_default(),
            price: self.price,
            category,
            subcategory: non_empty(self.subcategory),
            stock,
            image: non_empty(self.image),
        })
    }
}

/// GET /products - list the catalog, filtered.
async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Product>>> {
    let filter = query.into_filter()?;
    let products = ProductRepository::new(state.pool()).list(&filter).await?;

    Ok(Json(products))
}

/// GET /products/{id} - one listing.
async fn show(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;

    Ok(Json(product))
}

/// POST /products - create a listing; sellers only.
async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>)> {
    if !user.role.can_sell() {
        return Err(AppError::PermissionDenied(
            "Only sellers can create products".to_owned(),
        ));
    }

    let data = payload.into_data()?;
    let product = ProductRepository::new(state.pool())
        .create(&data, Some(user.id))
        .await?;

    tracing::info!(product_id = %product.id, seller_id = %user.id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id} - replace a listing; the owning seller only.
///
/// A non-owner gets the same 404 as a missing id: the write surface of a
/// listing behaves as if other sellers' products do not exist.
async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    let products = ProductRepository::new(state.pool());

    require_owned(&products, id, user.id).await?;

    let data = payload.into_data()?;
    let product = products.update(id, &data).await?;

    Ok(Json(product))
}

/// DELETE /products/{id} - delete a listing; the owning seller only.
async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let id = ProductId::new(id);
    let products = ProductRepository::new(state.pool());

    require_owned(&products, id, user.id).await?;

    products.delete(id).await?;

    tracing::info!(product_id = %id, seller_id = %user.id, "Product deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Fail with 404 unless `user` owns the product. Ownership misses are
/// indistinguishable from absence.
async fn require_owned(
    products: &ProductRepository<'_>,
    id: ProductId,
    user: UserId,
) -> Result<()> {
    let existing = products
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))?;
    if !existing.is_owned_by(user) {
        return Err(AppError::NotFound("Product not found".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_empty_params_are_ignored() {
        let query = ListQuery {
            search: Some("  ".to_owned()),
            category: Some(String::new()),
            min_price: None,
            max_price: Some(String::new()),
        };
        let filter = query.into_filter().unwrap();
        assert!(filter.search.is_none());
        assert!(filter.category.is_none());
        assert!(filter.max_price.is_none());
    }

    #[test]
    fn test_list_query_parses_bounds_and_category() {
        let query = ListQuery {
            search: Some("laptop".to_owned()),
            category: Some("electronics".to_owned()),
            min_price: Some("100".to_owned()),
            max_price: Some("1999.99".to_owned()),
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.search.as_deref(), Some("laptop"));
        assert_eq!(filter.category, Some(ProductCategory::Electronics));
        assert_eq!(filter.min_price, Some(Decimal::new(100, 0)));
        assert_eq!(filter.max_price, Some(Decimal::new(199_999, 2)));
    }

    #[test]
    fn test_list_query_rejects_bad_category_and_price() {
        let query = ListQuery {
            category: Some("vehicles".to_owned()),
            ..ListQuery::default()
        };
        assert!(matches!(
            query.into_filter(),
            Err(AppError::Validation(_))
        ));

        let query = ListQuery {
            min_price: Some("cheap".to_owned()),
            ..ListQuery::default()
        };
        assert!(matches!(
            query.into_filter(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_payload_defaults() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"name": "Mouse", "price": "24.99"}"#).unwrap();
        let data = payload.into_data().unwrap();
        assert_eq!(data.name, "Mouse");
        assert_eq!(data.description, "");
        assert_eq!(data.stock, 0);
        assert!(data.category.is_none());
    }

    #[test]
    fn test_payload_rejects_unknown_fields() {
        let result = serde_json::from_str::<ProductPayload>(
            r#"{"name": "Mouse", "price": "24.99", "seller_id": 1}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_payload_rejects_blank_name_and_negative_stock() {
        let payload: ProductPayload =
            serde_json::from_str(r#"{"name": "   ", "price": "1.00"}"#).unwrap();
        assert!(matches!(
            payload.into_data(),
            Err(AppError::Validation(_))
        ));

        let payload: ProductPayload =
            serde_json::from_str(r#"{"name": "Mouse", "price": "1.00", "stock": -3}"#).unwrap();
        assert!(matches!(
            payload.into_data(),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_payload_rejects_negative_price() {
        let result =
            serde_json::from_str::<ProductPayload>(r#"{"name": "Mouse", "price": "-1.00"}"#);
        assert!(result.is_err());
    }
}
