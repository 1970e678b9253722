//! Order routes: checkout and order history.

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;

use bazaar_core::{OrderId, OrderStatus, PaymentMethod};

use crate::db::RepositoryError;
use crate::db::orders::OrderRepository;
use crate::error::{AppError, Result};
use crate::extract::Json;
use crate::middleware::RequireAuth;
use crate::models::OrderWithItems;
use crate::state::AppState;

/// Router for order routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(checkout))
        .route("/{id}", get(show).patch(update_status))
}

/// Checkout request body. Both fields are optional; an empty object (or no
/// body at all) checks out with cash-on-delivery and no shipping address.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub payment_method: Option<PaymentMethod>,
    #[serde(default)]
    pub shipping_address: Option<String>,
}

/// Order status update request body.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateOrderRequest {
    pub status: OrderStatus,
}

/// GET /orders - the caller's orders, newest first.
async fn list(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool()).list(user.id).await?;

    Ok(Json(orders))
}

/// POST /orders - convert the caller's cart into an order.
async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    body: Option<Json<CheckoutRequest>>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let payment_method = request.payment_method.unwrap_or_default();
    let shipping_address = request.shipping_address.unwrap_or_default();

    let order = OrderRepository::new(state.pool())
        .checkout(user.id, payment_method, &shipping_address)
        .await?;

    tracing::info!(
        order_id = %order.order.id,
        user_id = %user.id,
        total = %order.order.total_price,
        "Order placed"
    );

    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders/{id} - one of the caller's orders.
async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderRepository::new(state.pool())
        .get(OrderId::new(id), user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".to_owned()))?;

    Ok(Json(order))
}

/// PATCH /orders/{id} - update the status of one of the caller's orders.
async fn update_status(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<i32>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<OrderWithItems>> {
    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), user.id, request.status)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Order not found".to_owned()),
            other => other.into(),
        })?;

    Ok(Json(order))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_request_empty_body_defaults() {
        let request: CheckoutRequest = serde_json::from_str("{}").unwrap();
        assert!(request.payment_method.is_none());
        assert!(request.shipping_address.is_none());
    }

    #[test]
    fn test_checkout_request_parses_payment_method() {
        let request: CheckoutRequest =
            serde_json::from_str(r#"{"payment_method": "upi", "shipping_address": "12 MG Road"}"#)
                .unwrap();
        assert_eq!(request.payment_method, Some(PaymentMethod::Upi));
    }

    #[test]
    fn test_checkout_request_rejects_unknown_payment_method() {
        assert!(serde_json::from_str::<CheckoutRequest>(r#"{"payment_method": "crypto"}"#).is_err());
    }

    #[test]
    fn test_update_request_rejects_total_override() {
        let result = serde_json::from_str::<UpdateOrderRequest>(
            r#"{"status": "completed", "total_price": "0.01"}"#,
        );
        assert!(result.is_err());
    }
}
