//! Shared Diesel error classification for the repository adapters.
//!
//! Each adapter turns a [`StoreFailure`] into its own port error so the
//! domain sees connection problems, constraint violations and query failures
//! as distinct variants. Raw database messages are logged at debug level and
//! never propagated.

use tracing::debug;

use super::pool::PoolError;

/// Database failure reduced to the distinctions the ports care about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// Pool checkout or a closed connection.
    Connection(String),
    /// A unique index rejected the write.
    UniqueViolation { constraint: String },
    /// A foreign key rejected the write.
    ForeignKeyViolation { constraint: String },
    /// Anything else.
    Query(&'static str),
}

impl StoreFailure {
    /// Whether the violated constraint mentions `needle`.
    pub(crate) fn constraint_mentions(&self, needle: &str) -> bool {
        match self {
            Self::UniqueViolation { constraint } | Self::ForeignKeyViolation { constraint } => {
                constraint.contains(needle)
            }
            Self::Connection(_) | Self::Query(_) => false,
        }
    }
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Prefer the reported constraint name, falling back to the message text.
fn constraint_label(info: &dyn diesel::result::DatabaseErrorInformation) -> String {
    info.constraint_name()
        .map_or_else(|| info.message().to_lowercase(), str::to_lowercase)
}

/// Classify a Diesel error and emit debug context.
pub(crate) fn classify_diesel_error(error: diesel::result::Error) -> StoreFailure {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(
                ?kind,
                message = info.message(),
                constraint = ?info.constraint_name(),
                "diesel operation failed"
            );
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => StoreFailure::Query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => StoreFailure::UniqueViolation {
                constraint: constraint_label(info.as_ref()),
            },
            DatabaseErrorKind::ForeignKeyViolation => StoreFailure::ForeignKeyViolation {
                constraint: constraint_label(info.as_ref()),
            },
            DatabaseErrorKind::ClosedConnection => {
                StoreFailure::Connection("database connection error".to_owned())
            }
            _ => StoreFailure::Query("database error"),
        },
        _ => StoreFailure::Query("database error"),
    }
}
