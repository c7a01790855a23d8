//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::domain::ports::StorageError;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration to the database at `database_url`.
///
/// Runs on a blocking thread because the migration harness needs a
/// synchronous connection.
///
/// # Errors
///
/// [`StorageError::Connection`] when the database is unreachable and
/// [`StorageError::Query`] when a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), StorageError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| StorageError::connection(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| StorageError::query(format!("migration: {err}")))?;
        info!(count = applied.len(), "applied storefront migrations");
        Ok(())
    })
    .await
    .map_err(|err| StorageError::query(format!("migration task failed: {err}")))?
}
