//! Cart routes.
//!
//! The cart is addressed as a singleton: every route operates on the calling
//! user's cart, which is created on first touch.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;

use bazaar_core::{CartId, ProductId};

use crate::db::RepositoryError;
use crate::db::carts::CartRepository;
use crate::db::products::ProductRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::{CartLine, CartWithItems, Product};
use crate::state::AppState;

/// Router for cart routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(show).post(add_item).patch(update_item).delete(remove_item))
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AddItemRequest {
    pub product_id: i32,
    /// Units to add; defaults to 1.
    #[serde(default)]
    pub quantity: Option<i32>,
}

/// Quantity update request body. An absent quantity, or one of zero or less,
/// removes the line.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateItemRequest {
    pub product_id: i32,
    #[serde(default)]
    pub quantity: Option<i32>,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoveItemRequest {
    pub product_id: i32,
}

/// GET /cart - the caller's cart with all lines, created if absent.
async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<CartWithItems>> {
    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;
    let items = carts.items(cart.id).await?;

    Ok(Json(CartWithItems { cart, items }))
}

/// POST /cart - add units of a product; repeated adds increment the line.
async fn add_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartLine>)> {
    let quantity = request.quantity.unwrap_or(1);
    if quantity < 1 {
        return Err(AppError::Validation(
            "quantity must be at least 1".to_owned(),
        ));
    }

    let product = require_product(&state, request.product_id).await?;

    let carts = CartRepository::new(state.pool());
    let cart = carts.get_or_create(user.id).await?;
    let item = carts.add_item(cart.id, product.id, quantity).await?;

    Ok((StatusCode::CREATED, Json(CartLine { item, product })))
}

/// PATCH /cart - set a line's quantity; zero or negative removes it.
async fn update_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<UpdateItemRequest>,
) -> Result<Response> {
    let carts = CartRepository::new(state.pool());
    let cart = carts
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_owned()))?;

    let product_id = ProductId::new(request.product_id);

    let Some(quantity) = request.quantity.filter(|q| *q >= 1) else {
        remove_line(&carts, cart.id, product_id).await?;
        return Ok(Json(json!({ "detail": "Item removed from cart" })).into_response());
    };

    let product = require_product(&state, request.product_id).await?;
    let item = carts
        .set_quantity(cart.id, product_id, quantity)
        .await
        .map_err(not_found_as_missing_line)?;

    Ok(Json(CartLine { item, product }).into_response())
}

/// DELETE /cart - remove a product's line entirely.
async fn remove_item(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(request): Json<RemoveItemRequest>,
) -> Result<Json<serde_json::Value>> {
    let carts = CartRepository::new(state.pool());
    let cart = carts
        .get(user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Cart not found".to_owned()))?;

    remove_line(&carts, cart.id, ProductId::new(request.product_id)).await?;

    Ok(Json(json!({ "detail": "Item removed from cart" })))
}

/// Fetch a product or fail with a cart-scoped 404.
async fn require_product(state: &AppState, id: i32) -> Result<Product> {
    ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_owned()))
}

async fn remove_line(
    carts: &CartRepository<'_>,
    cart_id: CartId,
    product_id: ProductId,
) -> Result<()> {
    carts
        .remove_item(cart_id, product_id)
        .await
        .map_err(not_found_as_missing_line)
}

fn not_found_as_missing_line(e: RepositoryError) -> AppError {
    match e {
        RepositoryError::NotFound => AppError::NotFound("Cart item not found".to_owned()),
        other => other.into(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_add_request_defaults_quantity() {
        let request: AddItemRequest = serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        assert_eq!(request.product_id, 3);
        assert!(request.quantity.is_none());
    }

    #[test]
    fn test_add_request_rejects_unknown_fields() {
        let result =
            serde_json::from_str::<AddItemRequest>(r#"{"product_id": 3, "price": "0.01"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_update_request_quantity_is_optional() {
        let request: UpdateItemRequest = serde_json::from_str(r#"{"product_id": 3}"#).unwrap();
        assert!(request.quantity.is_none());
        let request: UpdateItemRequest =
            serde_json::from_str(r#"{"product_id": 3, "quantity": 0}"#).unwrap();
        assert_eq!(request.quantity, Some(0));
    }
}
