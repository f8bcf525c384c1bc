//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p storage --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use chrono::{Duration, Utc};
use common::{OrderId, ProductId, UserId};
use domain::{CartItem, Money, Order, Product};
use sqlx::PgPool;
use storage::{OrderLog, PostgresOrderLog, PostgresProductStore, ProductStore, StorageError};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!("../../../migrations/0001_create_tables.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh pool with cleared tables
async fn get_test_pool() -> PgPool {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE products, orders")
        .execute(&pool)
        .await
        .unwrap();

    pool
}

fn sample_product(id: &str, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        description: String::from("Integration test product"),
        price: Money::from_cents(2499),
        image_url: String::from("https://example.com/image.jpg"),
        stock,
        category: Some(String::from("Electronics")),
        tags: Some(vec![String::from("Gadget")]),
    }
}

#[tokio::test]
async fn insert_and_get_all_products() {
    let store = PostgresProductStore::new(get_test_pool().await);

    store.insert(sample_product("prod_001", 25)).await.unwrap();
    store.insert(sample_product("prod_002", 15)).await.unwrap();

    let products = store.get_all().await.unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id.as_str(), "prod_001");
    assert_eq!(products[0].category.as_deref(), Some("Electronics"));
}

#[tokio::test]
async fn get_by_id_roundtrips_document() {
    let store = PostgresProductStore::new(get_test_pool().await);
    let product = sample_product("prod_001", 25);

    store.insert(product.clone()).await.unwrap();

    let found = store
        .get_by_id(&ProductId::new("prod_001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, product);

    let missing = store.get_by_id(&ProductId::new("prod_404")).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn update_stock_rewrites_single_field() {
    let store = PostgresProductStore::new(get_test_pool().await);
    store.insert(sample_product("prod_001", 25)).await.unwrap();

    store
        .update_stock(&ProductId::new("prod_001"), 7)
        .await
        .unwrap();

    let found = store
        .get_by_id(&ProductId::new("prod_001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.stock, 7);
    // Everything else in the document is untouched.
    assert_eq!(found.price.cents(), 2499);
    assert_eq!(found.name, "Product prod_001");
}

#[tokio::test]
async fn update_stock_unknown_product_fails() {
    let store = PostgresProductStore::new(get_test_pool().await);

    let result = store.update_stock(&ProductId::new("prod_404"), 1).await;
    assert!(matches!(result, Err(StorageError::ProductNotFound(_))));
}

#[tokio::test]
async fn insert_replaces_existing_document() {
    let store = PostgresProductStore::new(get_test_pool().await);
    store.insert(sample_product("prod_001", 25)).await.unwrap();

    let mut updated = sample_product("prod_001", 3);
    updated.name = String::from("Renamed");
    store.insert(updated).await.unwrap();

    let products = store.get_all().await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Renamed");
    assert_eq!(products[0].stock, 3);
}

#[tokio::test]
async fn clear_removes_everything() {
    let store = PostgresProductStore::new(get_test_pool().await);
    store.insert(sample_product("prod_001", 25)).await.unwrap();
    store.insert(sample_product("prod_002", 15)).await.unwrap();

    store.clear().await.unwrap();
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn order_log_appends_and_lists_newest_first() {
    let pool = get_test_pool().await;
    let log = PostgresOrderLog::new(pool);
    let user = UserId::new("user-1");
    let other = UserId::new("user-2");

    let item = CartItem::new(sample_product("prod_001", 10), 2);
    let older = Order::from_cart_items(&[item.clone()], Utc::now() - Duration::hours(2));
    let newer = Order::from_cart_items(&[item.clone()], Utc::now());
    let foreign = Order::from_cart_items(&[item], Utc::now());

    log.append(&user, &older).await.unwrap();
    log.append(&user, &newer).await.unwrap();
    log.append(&other, &foreign).await.unwrap();

    let orders = log.list_for_user(&user).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id, newer.id);
    assert_eq!(orders[1].id, older.id);
    assert_eq!(orders[0].total.cents(), 4998);
}

#[tokio::test]
async fn order_log_get_by_id() {
    let log = PostgresOrderLog::new(get_test_pool().await);
    let user = UserId::new("user-1");

    let item = CartItem::new(sample_product("prod_001", 10), 1);
    let order = Order::from_cart_items(&[item], Utc::now());
    log.append(&user, &order).await.unwrap();

    let found = log.get(&order.id).await.unwrap().unwrap();
    assert_eq!(found.order_number, order.order_number);
    assert_eq!(found.items.len(), 1);

    assert!(log.get(&OrderId::new()).await.unwrap().is_none());
}
