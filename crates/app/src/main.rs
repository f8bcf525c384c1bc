//! Catalog maintenance CLI.

use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use storage::{PostgresProductStore, ProductStore};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use app::{Config, seed};

#[derive(Parser)]
#[command(name = "grocer", about = "Grocery client catalog maintenance")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seed the product catalog with the starter products.
    Seed,
    /// Delete every product from the catalog.
    Clear,
    /// List the products currently in the catalog.
    List,
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    // 2. Connect to the product store
    let config = Config::from_env();
    let database_url = config
        .database_url
        .expect("DATABASE_URL must be set for catalog maintenance");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("failed to connect to database");

    let store = PostgresProductStore::new(pool);
    store
        .run_migrations()
        .await
        .expect("failed to run migrations");

    // 3. Run the command
    match cli.command {
        Command::Seed => {
            let products = seed::seed_products();
            let count = products.len();
            for product in products {
                let name = product.name.clone();
                store.insert(product).await.expect("failed to insert product");
                tracing::info!(%name, "added");
            }
            tracing::info!(count, "catalog seeded");
        }
        Command::Clear => {
            store.clear().await.expect("failed to clear products");
            tracing::info!("catalog cleared");
        }
        Command::List => {
            let products = store.get_all().await.expect("failed to fetch products");
            for product in &products {
                println!(
                    "{:<10} {:<28} {:>8}  stock {}",
                    product.id, product.name, product.price, product.stock
                );
            }
            println!("{} products", products.len());
        }
    }
}
