//! HTTP route handlers.
//!
//! # Route Table
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | GET | `/` | - | API index |
//! | POST | `/users/register` | - | Register a buyer account |
//! | POST | `/users/login` | - | Login, issue bearer token |
//! | POST | `/users/logout` | token | Revoke the bearer token |
//! | GET | `/users/profile` | token | Current account |
//! | PUT | `/users/profile` | token | Update contact email |
//! | GET | `/products` | - | List/search the catalog |
//! | POST | `/products` | seller | Create a listing |
//! | GET | `/products/{id}` | - | One listing |
//! | PUT | `/products/{id}` | owner | Replace a listing |
//! | DELETE | `/products/{id}` | owner | Delete a listing |
//! | GET | `/cart` | token | The user's cart with items |
//! | POST | `/cart` | token | Add a product (increments) |
//! | PATCH | `/cart` | token | Set quantity (<= 0 removes) |
//! | DELETE | `/cart` | token | Remove a product |
//! | GET | `/orders` | token | The user's orders |
//! | POST | `/orders` | token | Checkout the cart |
//! | GET | `/orders/{id}` | token | One order |
//! | PATCH | `/orders/{id}` | token | Update order status |

pub mod cart;
pub mod orders;
pub mod products;
pub mod root;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(root::router())
        .nest("/users", users::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
}
