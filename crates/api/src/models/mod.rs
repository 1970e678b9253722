//! Domain models for the Bazaar API.
//!
//! These are validated domain objects hydrated from database rows. Composite
//! types (`CartWithItems`, `OrderWithItems`) mirror the JSON shapes the API
//! responds with: line items embed their product.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartLine, CartWithItems};
pub use order::{Order, OrderItem, OrderLine, OrderWithItems};
pub use product::Product;
pub use user::User;
