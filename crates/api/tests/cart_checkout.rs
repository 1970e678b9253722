//! Database-backed tests for the cart and checkout flow.
//!
//! These exercise the repository layer against a real `PostgreSQL` instance
//! and are ignored by default so `cargo test` stays self-contained. Run them
//! against a scratch database with:
//!
//! ```bash
//! BAZAAR_TEST_DATABASE_URL=postgres://localhost/bazaar_test \
//!     cargo test -p bazaar-api -- --ignored
//! ```

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;

use bazaar_api::db::carts::CartRepository;
use bazaar_api::db::orders::{CheckoutError, OrderRepository};
use bazaar_api::db::products::{ProductData, ProductRepository};
use bazaar_api::db::users::UserRepository;
use bazaar_api::models::{Product, User};
use bazaar_core::{PaymentMethod, Price, UserRole, Username};

const DB_URL_VAR: &str = "BAZAAR_TEST_DATABASE_URL";

async fn test_pool() -> PgPool {
    let url = std::env::var(DB_URL_VAR)
        .unwrap_or_else(|_| panic!("{DB_URL_VAR} must point at a scratch database"));
    let pool = bazaar_api::db::create_pool(&SecretString::from(url))
        .await
        .expect("connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    pool
}

// Usernames are globally unique, so every test gets its own user.
async fn create_user(pool: &PgPool) -> User {
    let username = Username::parse(&format!("shopper{}", rand::random::<u32>()))
        .expect("valid username");
    UserRepository::new(pool)
        .create_with_password(&username, None, UserRole::Buyer, "unused-hash")
        .await
        .expect("create user")
}

async fn create_product(pool: &PgPool, name: &str, cents: i64) -> Product {
    let data = ProductData {
        name: name.to_owned(),
        description: String::new(),
        price: Price::new(Decimal::new(cents, 2)).expect("valid price"),
        category: None,
        subcategory: None,
        stock: 10,
        image: None,
    };
    ProductRepository::new(pool)
        .create(&data, None)
        .await
        .expect("create product")
}

#[tokio::test]
#[ignore = "needs a PostgreSQL database; set BAZAAR_TEST_DATABASE_URL"]
async fn test_adding_same_product_twice_merges_into_one_line() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);

    let user = create_user(&pool).await;
    let product = create_product(&pool, "Merge target", 4999).await;
    let cart = carts.get_or_create(user.id).await.unwrap();

    let first = carts.add_item(cart.id, product.id, 2).await.unwrap();
    let second = carts.add_item(cart.id, product.id, 3).await.unwrap();

    // Same line, summed quantity
    assert_eq!(second.id, first.id);
    assert_eq!(second.quantity, 5);

    let lines = carts.items(cart.id).await.unwrap();
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0].item.quantity, 5);
}

#[tokio::test]
#[ignore = "needs a PostgreSQL database; set BAZAAR_TEST_DATABASE_URL"]
async fn test_checkout_empties_cart_and_freezes_prices() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let products = ProductRepository::new(&pool);
    let orders = OrderRepository::new(&pool);

    let user = create_user(&pool).await;
    let phone = create_product(&pool, "Phone", 10000).await; // 100.00
    let case = create_product(&pool, "Case", 5000).await; // 50.00
    let cart = carts.get_or_create(user.id).await.unwrap();
    carts.add_item(cart.id, phone.id, 2).await.unwrap();
    carts.add_item(cart.id, case.id, 1).await.unwrap();

    let placed = orders
        .checkout(user.id, PaymentMethod::Cod, "12 Hill Road")
        .await
        .unwrap();

    // 100.00 x 2 + 50.00 x 1
    assert_eq!(placed.order.total_price.amount(), Decimal::new(25000, 2));
    assert_eq!(placed.items.len(), 2);
    assert!(carts.items(cart.id).await.unwrap().is_empty());

    // A later catalog price change must not touch the placed order
    let new_price = ProductData {
        name: phone.name.clone(),
        description: phone.description.clone(),
        price: Price::new(Decimal::new(15000, 2)).unwrap(),
        category: phone.category,
        subcategory: phone.subcategory.clone(),
        stock: phone.stock,
        image: phone.image.clone(),
    };
    products.update(phone.id, &new_price).await.unwrap();

    let fetched = orders.get(placed.order.id, user.id).await.unwrap().unwrap();
    assert_eq!(fetched.order.total_price.amount(), Decimal::new(25000, 2));
    let phone_line = fetched
        .items
        .iter()
        .find(|line| line.item.product_id == Some(phone.id))
        .unwrap();
    assert_eq!(phone_line.item.price.amount(), Decimal::new(10000, 2));
    // The joined product reflects today's price
    assert_eq!(
        phone_line.product.as_ref().unwrap().price.amount(),
        Decimal::new(15000, 2)
    );
}

#[tokio::test]
#[ignore = "needs a PostgreSQL database; set BAZAAR_TEST_DATABASE_URL"]
async fn test_checkout_rejects_empty_and_missing_carts() {
    let pool = test_pool().await;
    let carts = CartRepository::new(&pool);
    let orders = OrderRepository::new(&pool);

    let without_cart = create_user(&pool).await;
    let result = orders
        .checkout(without_cart.id, PaymentMethod::Cod, "")
        .await;
    assert!(matches!(result, Err(CheckoutError::NoCart)));

    let with_empty_cart = create_user(&pool).await;
    carts.get_or_create(with_empty_cart.id).await.unwrap();
    let result = orders
        .checkout(with_empty_cart.id, PaymentMethod::Cod, "")
        .await;
    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
}
