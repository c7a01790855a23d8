//! Startup seeding orchestration.

use catalogue_seed::{CatalogueRegistry, RegistryError};
use thiserror::Error;
use tracing::info;

use super::config::CatalogueSeedSettings;
use super::seeder::{CatalogueSeedingError, SeedOutcome, seed_product_set};
use crate::domain::ports::Storage;

/// Errors returned while executing startup seeding.
#[derive(Debug, Error)]
pub enum StartupSeedingError {
    /// The registry could not be read, parsed or queried.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Conversion or persistence failed.
    #[error("catalogue seeding error: {0}")]
    Seeding(#[from] CatalogueSeedingError),
    /// Seed name must not be empty.
    #[error("seed name must not be empty")]
    EmptySeedName,
}

/// Apply the configured product set when seeding is enabled.
///
/// # Examples
///
/// ```rust,no_run
/// use storefront::catalogue_seeding::{CatalogueSeedSettings, seed_catalogue_on_startup};
/// use storefront::outbound::InMemoryStorage;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let settings = CatalogueSeedSettings {
///     enabled: true,
///     seed_name: None,
///     registry_path: None,
/// };
/// let storage = InMemoryStorage::new();
/// let outcome = seed_catalogue_on_startup(&settings, &storage).await?;
/// assert!(outcome.is_some());
/// # Ok(())
/// # }
/// ```
pub async fn seed_catalogue_on_startup(
    settings: &CatalogueSeedSettings,
    storage: &dyn Storage,
) -> Result<Option<SeedOutcome>, StartupSeedingError> {
    if !settings.enabled {
        info!(reason = "disabled", "catalogue seeding skipped");
        return Ok(None);
    }

    let seed_name = settings.seed_name().trim();
    if seed_name.is_empty() {
        return Err(StartupSeedingError::EmptySeedName);
    }

    let registry = CatalogueRegistry::from_file(&settings.registry_path())?;
    let set = registry.find_set(seed_name)?;
    let outcome = seed_product_set(storage, set).await?;

    info!(
        seed_name = %outcome.set_name,
        inserted = outcome.inserted,
        skipped = outcome.skipped,
        "catalogue seeding applied"
    );
    Ok(Some(outcome))
}
