//! Diesel and pool error mapping onto `StorageError`.

use tracing::{debug, warn};

use crate::domain::ports::StorageError;

use super::pool::PoolError;

const OUT_OF_RANGE: &str = "out of range";

/// Map pool failures to connection errors.
pub(crate) fn map_pool_error(error: PoolError) -> StorageError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    StorageError::connection(message)
}

/// Map Diesel failures to storage errors.
///
/// Unique violations become `Conflict` so callers can tell duplicates from
/// outages, and PostgreSQL's `integer out of range` (an additive merge past
/// `INT4`) becomes `OutOfRange`. Driver messages are logged but never
/// forwarded.
pub(crate) fn map_diesel_error(error: diesel::result::Error) -> StorageError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(error_type = %std::any::type_name_of_val(&error), "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => StorageError::not_found("record not found"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            StorageError::conflict(
                info.constraint_name()
                    .map_or_else(|| "unique constraint".to_owned(), str::to_owned),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            warn!(
                constraint = info.constraint_name(),
                "foreign key violation in storefront storage"
            );
            StorageError::query("referenced record missing")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StorageError::connection("database connection error")
        }
        DieselError::DatabaseError(_, info) if info.message().contains(OUT_OF_RANGE) => {
            StorageError::out_of_range("value exceeds the column range")
        }
        DieselError::QueryBuilderError(_) => StorageError::query("database query error"),
        _ => StorageError::query("database error"),
    }
}
