//! Seed the PostgreSQL catalogue from a product-set registry.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io::Write;
use std::path::PathBuf;

use catalogue_seed::CatalogueRegistry;
use clap::Parser;
use color_eyre::eyre::{WrapErr, eyre};
use storefront::catalogue_seeding::seed_product_set;
use storefront::outbound::persistence::{DbPool, DieselStorage, PoolConfig, run_migrations};
use tokio::runtime::Builder;

const DATABASE_URL_ENV: &str = "STOREFRONT_DATABASE_URL";

/// `seed-catalogue` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seed-catalogue",
    about = "Insert a named product set into the storefront catalogue",
    version
)]
struct CliArgs {
    /// Path to the registry JSON file.
    #[arg(long = "registry", value_name = "path")]
    registry: PathBuf,
    /// Product set to insert.
    #[arg(long = "name", value_name = "name", default_value = "yamaha-parts")]
    name: String,
    /// Database connection URL. Falls back to `STOREFRONT_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main())
}

async fn async_main() -> color_eyre::Result<()> {
    let args = CliArgs::parse();
    let database_url = args
        .database_url
        .or_else(|| std::env::var(DATABASE_URL_ENV).ok())
        .ok_or_else(|| eyre!("pass --database-url or set {DATABASE_URL_ENV}"))?;

    let registry = CatalogueRegistry::from_file(&args.registry)
        .wrap_err_with(|| format!("load registry {}", args.registry.display()))?;
    let set = registry.find_set(&args.name)?;

    run_migrations(&database_url)
        .await
        .wrap_err("apply migrations")?;
    let pool = DbPool::new(PoolConfig::new(&database_url).with_max_size(2))
        .await
        .wrap_err("create database pool")?;
    let storage = DieselStorage::new(pool);

    let outcome = seed_product_set(&storage, set).await?;
    writeln!(
        std::io::stdout().lock(),
        "seeded '{}': {} inserted, {} already present",
        outcome.set_name,
        outcome.inserted,
        outcome.skipped
    )?;
    Ok(())
}
