//! API index route.

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

use crate::state::AppState;

/// Router for the index route.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(api_index))
}

/// GET / - map of the API surface, for humans poking at the root URL.
async fn api_index() -> Json<Value> {
    Json(json!({
        "register": "/users/register",
        "login": "/users/login",
        "logout": "/users/logout",
        "profile": "/users/profile",
        "products": "/products",
        "product": "/products/{id}",
        "cart": "/cart",
        "orders": "/orders",
        "order": "/orders/{id}",
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_index_lists_entry_points() {
        let Json(body) = api_index().await;
        assert_eq!(body["login"], "/users/login");
        assert_eq!(body["cart"], "/cart");
    }
}
