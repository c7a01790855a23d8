//! Seeding the catalogue from the product-set registry.

mod config;
mod seeder;
mod startup;

pub use config::CatalogueSeedSettings;
pub use seeder::{CatalogueSeedingError, SeedOutcome, seed_product_set};
pub use startup::{StartupSeedingError, seed_catalogue_on_startup};
