use sqlx::migrate::MigrateError;

use crate::traits::DocumentStoreError;

impl From<sqlx::Error> for DocumentStoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Configuration(_) |
            sqlx::Error::Io(_) |
            sqlx::Error::Tls(_) |
            sqlx::Error::PoolTimedOut |
            sqlx::Error::PoolClosed => Self::ConnectionError(e.to_string()),
            e => Self::QueryError(e.to_string()),
        }
    }
}

impl From<MigrateError> for DocumentStoreError {
    fn from(e: MigrateError) -> Self {
        Self::ConnectionError(format!("Could not run migrations. {e}"))
    }
}
